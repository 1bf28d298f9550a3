use std::collections::BTreeMap;

use crate::*;

pub(crate) fn run_cli<W: Write>(cli: Cli, style: OutputStyle, out: &mut W) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        return write_completions_script(shell, out);
    }

    let state_root = resolve_state_root(cli.state_root, std::env::var_os(STATE_ROOT_ENV))?;
    let store = SettingsStore::new(state_root);
    let mut settings = OverlaySettings::new();
    settings.add_change_listener(Arc::new(LoggingListener));
    store.load_into(&mut settings)?;

    let user = cli.user;
    let mutated = match cli.command {
        Commands::List { json } => {
            let by_target = settings.get_overlays_for_user(user);
            if json {
                let rendered = by_target
                    .iter()
                    .map(|(target, overlays)| {
                        let overlays = overlays.iter().map(Arc::as_ref).collect::<Vec<_>>();
                        (target.as_str(), overlays)
                    })
                    .collect::<BTreeMap<&str, Vec<&OverlayInfo>>>();
                let content = serde_json::to_string_pretty(&rendered)
                    .context("failed serializing overlay list")?;
                writeln!(out, "{content}")?;
            } else {
                for line in format_overlay_list_lines(&by_target, style) {
                    writeln!(out, "{line}")?;
                }
            }
            false
        }
        Commands::Init {
            package,
            target,
            base_code_path,
        } => {
            settings.init(&package, user, &target, &base_code_path);
            let message = format!("registered {package} for {target} (user {user})");
            writeln!(out, "{}", render_status_line(style, "ok", &message))?;
            true
        }
        Commands::Remove { package } => {
            if !settings.contains(&package, user) {
                anyhow::bail!("overlay '{package}' is not registered for user {user}");
            }
            settings.remove(&package, user);
            let message = format!("removed {package} (user {user})");
            writeln!(out, "{}", render_status_line(style, "ok", &message))?;
            true
        }
        Commands::Enable { package } => {
            settings.set_enabled(&package, user, true)?;
            true
        }
        Commands::Disable { package } => {
            settings.set_enabled(&package, user, false)?;
            true
        }
        Commands::SetState {
            package,
            state,
            wait,
        } => {
            let Some(state) = OverlayState::parse(&state) else {
                anyhow::bail!("unknown overlay state '{state}'");
            };
            settings.set_state(&package, user, state, wait)?;
            true
        }
        Commands::SetUpgrading { package, upgrading } => {
            settings.set_upgrading(&package, user, upgrading)?;
            true
        }
        Commands::SetPriority { package, parent } => {
            let moved = match parent.as_str() {
                "lowest" => settings.set_lowest_priority(&package, user),
                "highest" => settings.set_highest_priority(&package, user),
                parent => settings.set_priority(&package, parent, user),
            };
            if !moved {
                anyhow::bail!(
                    "failed to change priority of '{package}' relative to '{parent}' for user {user}"
                );
            }
            true
        }
        Commands::RemoveUser => {
            settings.remove_user(user);
            let message = format!("removed all overlays for user {user}");
            writeln!(out, "{}", render_status_line(style, "ok", &message))?;
            true
        }
        Commands::Users => {
            for user in settings.get_users() {
                writeln!(out, "{user}")?;
            }
            false
        }
        Commands::Dump => {
            settings
                .dump(out)
                .context("failed writing overlay settings dump")?;
            false
        }
        Commands::Completions { .. } => false,
    };

    if mutated {
        store.save(&settings)?;
    }
    Ok(())
}
