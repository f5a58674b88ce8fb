use clap::Command;
use clap_complete::{generate, Shell};

use super::CliResult;

pub fn run(shell: Shell, mut cmd: Command) -> CliResult {
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
