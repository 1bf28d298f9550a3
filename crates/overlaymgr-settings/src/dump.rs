use std::io::{self, Write};

use crate::OverlaySettings;

const TAB1: &str = "    ";
const TAB2: &str = "        ";
const TAB3: &str = "            ";

impl OverlaySettings {
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Settings")?;
        self.dump_items(out)?;
        self.dump_listeners(out)
    }

    fn dump_items<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{TAB1}Items")?;
        if self.entries.is_empty() {
            return writeln!(out, "{TAB2}<none>");
        }

        for entry in &self.entries {
            writeln!(out, "{TAB2}{}:{} {{", entry.package_name, entry.user_id)?;
            writeln!(out, "{TAB3}packageName.......: {}", entry.package_name)?;
            writeln!(out, "{TAB3}userId............: {}", entry.user_id)?;
            writeln!(
                out,
                "{TAB3}targetPackageName.: {}",
                entry.target_package_name()
            )?;
            writeln!(out, "{TAB3}baseCodePath......: {}", entry.base_code_path())?;
            writeln!(out, "{TAB3}state.............: {}", entry.state().as_str())?;
            writeln!(out, "{TAB3}isEnabled.........: {}", entry.is_enabled())?;
            writeln!(out, "{TAB3}isUpgrading.......: {}", entry.is_upgrading())?;
            writeln!(out, "{TAB2}}}")?;
        }
        Ok(())
    }

    fn dump_listeners<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{TAB1}Change listeners")?;
        if self.listeners().is_empty() {
            return writeln!(out, "{TAB2}<none>");
        }

        for listener in self.listeners() {
            writeln!(out, "{TAB2}{listener:?}")?;
        }
        Ok(())
    }
}
