use std::io::Write;

use anyhow::{Context, Result};
use clap_complete::Shell;

use crate::{Cli, CommandFactory};

pub(crate) fn write_completions_script<W: Write>(shell: Shell, writer: &mut W) -> Result<()> {
    let mut command = Cli::command();
    let mut generated = Vec::new();
    clap_complete::generate(shell, &mut command, "overlaymgr", &mut generated);

    writer
        .write_all(&generated)
        .with_context(|| "failed writing generated completion script")?;
    writer
        .write_all(b"\n")
        .with_context(|| "failed writing completion script delimiter")
}
