use crate::cli::{self, Commands};
use crate::command_table::{CommandId, OPEN_HANDLERS_FOLDER_LABEL};
use crate::dispatch::Invocation;
use crate::handlers_root::HandlersRoot;
use crate::icons::GlyphIcons;
use crate::launcher::{LaunchRequest, Launcher, SystemLauncher, Verb};
use crate::menu::{ContextMenu, SUBMENU_LABEL};
use crate::selection::Category;
use crate::{lifecycle, tree_builder, tui};
use anyhow::Result;
use std::path::PathBuf;

// Explicit --root / OPENWITH_ROOT wins over the documents folder.
fn resolve_root(cli_root: Option<PathBuf>) -> Result<HandlersRoot> {
    match cli_root {
        Some(path) => Ok(HandlersRoot::new(path)),
        None => Ok(HandlersRoot::from_documents_dir()?),
    }
}

fn launcher_from(config: &cli::LaunchConfig) -> SystemLauncher {
    SystemLauncher {
        file_manager: config
            .file_manager
            .clone()
            .unwrap_or_else(|| SystemLauncher::default_file_manager().to_string()),
        elevate_with: config
            .elevate_with
            .clone()
            .unwrap_or_else(|| SystemLauncher::default_elevate_with().to_string()),
    }
}

fn build_menu(paths: &[PathBuf], root: HandlersRoot, ids: cli::IdRange) -> Option<ContextMenu> {
    let menu = ContextMenu::build(paths, root, ids.id_first, ids.id_last, &GlyphIcons);
    if menu.is_none() {
        println!(
            "No room for the handler menu in command ids {}..{}; nothing to show.",
            ids.id_first, ids.id_last
        );
    }
    menu
}

fn describe(request: &LaunchRequest) -> String {
    match request.verb {
        Verb::Explore => format!("explore {}", request.program.display()),
        verb => format!("{} {}{}", verb, request.program.display(), request.command_line()),
    }
}

// Launch failures are reported but never fail the run.
fn dispatch_choice(
    menu: &ContextMenu,
    command_id: CommandId,
    elevate: bool,
    config: &cli::LaunchConfig,
) -> Result<()> {
    if config.dry_run {
        match menu.request_for(command_id, elevate) {
            Some(request) => println!("(Dry run: would {})", describe(&request)),
            None => println!("(Dry run: command id {} is not in the menu)", command_id),
        }
        return Ok(());
    }

    let launcher = launcher_from(config);
    match menu.dispatch(command_id, elevate, &launcher) {
        Ok(Invocation::Launched { program, verb }) => {
            println!("✅ Started {} ({})", program.display(), verb)
        }
        Ok(Invocation::OpenedHandlersFolder) => {
            println!("📂 Opened {}", menu.root().path().display())
        }
        Ok(Invocation::Ignored) => {
            println!("Command id {} is not in the menu; nothing to do.", command_id)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Launch failed");
            eprintln!("⚠️ Warning: {}", e);
        }
    }
    Ok(())
}

/// Text rendering of a menu's command table, in host order.
pub fn format_table(menu: &ContextMenu) -> String {
    let classification = menu.classification();
    let categories: Vec<String> = classification
        .categories()
        .iter()
        .map(|c| match (c, classification.common_extension()) {
            (Category::SpecificExtension, Some(ext)) => format!("{} ({})", c, ext),
            _ => c.to_string(),
        })
        .collect();

    let mut lines = vec![
        format!(
            "Selection: {} item(s); categories: {}",
            menu.selection().len(),
            if categories.is_empty() {
                "none".to_string()
            } else {
                categories.join(", ")
            }
        ),
        String::new(),
    ];

    let table = menu.table();
    for group in &table.groups {
        if group.separator_before {
            lines.push("      ────────".to_string());
        }
        lines.push(format!("      [{}]", group.category));
        for (id, entry) in &group.entries {
            let icon = entry.icon.as_ref().map(|i| i.as_str()).unwrap_or(" ");
            lines.push(format!(
                "{:>5} {} {}  ({})",
                id,
                icon,
                entry.display_name,
                entry.full_path.display()
            ));
        }
    }
    if !table.groups.is_empty() {
        lines.push("      ────────".to_string());
    }
    lines.push(format!(
        "{:>5}   {}",
        table.open_handlers_folder, OPEN_HANDLERS_FOLDER_LABEL
    ));
    lines.push(format!("{:>5}   (host separator)", table.host_separator));
    lines.push(format!("{:>5}   (submenu: {})", table.submenu_anchor, SUBMENU_LABEL));
    lines.push(String::new());
    lines.push(format!(
        "{} handler(s), {} command id(s) used",
        table.handler_count(),
        table.ids_consumed()
    ));

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

fn run_menu(args: cli::MenuArgs, root: HandlersRoot) -> Result<()> {
    let Some(menu) = build_menu(&args.paths, root, args.ids) else {
        return Ok(());
    };
    match tui::run_menu(&menu)? {
        Some(choice) => dispatch_choice(&menu, choice.command_id, choice.elevate, &args.launch),
        None => {
            println!("Menu closed without a choice.");
            Ok(())
        }
    }
}

fn run_table(args: cli::TableArgs, root: HandlersRoot) -> Result<()> {
    if let Some(menu) = build_menu(&args.paths, root, args.ids) {
        print!("{}", format_table(&menu));
    }
    Ok(())
}

fn run_invoke(args: cli::InvokeArgs, root: HandlersRoot) -> Result<()> {
    let Some(menu) = build_menu(&args.paths, root, args.ids) else {
        return Ok(());
    };
    dispatch_choice(&menu, args.id, args.elevate, &args.launch)
}

fn run_init(args: cli::InitArgs, root: HandlersRoot) -> Result<()> {
    let folders = root.scaffold()?;
    println!("✅ Handler folders ready under {}", root.path().display());
    for folder in folders.iter().skip(1) {
        println!("   {}", folder.display());
    }

    if args.open {
        let request = LaunchRequest {
            program: root.path().to_path_buf(),
            arguments: Vec::new(),
            verb: Verb::Explore,
        };
        if args.launch.dry_run {
            println!("(Dry run: would {})", describe(&request));
        } else if let Err(e) = launcher_from(&args.launch).launch(&request) {
            tracing::warn!(error = %e, "Could not open the handler root");
            eprintln!("⚠️ Warning: {}", e);
        }
    }
    Ok(())
}

fn run_tree(root: HandlersRoot) -> Result<()> {
    if !root.path().is_dir() {
        println!(
            "No handler registry at {} (run `openwith init`).",
            root.path().display()
        );
        return Ok(());
    }
    let entries = tree_builder::collect_registry(root.path());
    for label in tree_builder::build_tree_labels(&entries, root.path()) {
        println!("{}", label);
    }
    Ok(())
}

// Main orchestrator for the openwith commands.
pub fn run_openwith(cli_args: cli::Cli) -> Result<()> {
    let root = resolve_root(cli_args.root)?;
    tracing::debug!(root = %root.path().display(), "Handler root resolved");

    let outcome = match cli_args.command {
        Commands::Menu(args) => run_menu(args, root),
        Commands::Table(args) => run_table(args, root),
        Commands::Invoke(args) => run_invoke(args, root),
        Commands::Init(args) => run_init(args, root),
        Commands::Tree => run_tree(root),
    };
    tracing::trace!(
        live = lifecycle::live_instances(),
        unloadable = lifecycle::can_unload(),
        "Run finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    #[test]
    fn table_output_lists_groups_in_order() {
        let handlers = tempfile::tempdir().unwrap();
        for rel in [
            "Everything/foo.exe",
            "All files/bar.exe",
            "Files by Extension/(.txt)/baz.exe",
        ] {
            let path = handlers.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            File::create(path).unwrap();
        }
        let work = tempfile::tempdir().unwrap();
        let a = work.path().join("a.txt");
        let b = work.path().join("b.txt");
        File::create(&a).unwrap();
        File::create(&b).unwrap();

        let menu = ContextMenu::build(
            &[a, b],
            HandlersRoot::new(handlers.path()),
            1,
            100,
            &GlyphIcons,
        )
        .unwrap();
        let output = format_table(&menu);

        assert!(output.starts_with(
            "Selection: 2 item(s); categories: Specific extension (.txt), All files, Everything\n"
        ));
        let baz = output.find(" baz  (").unwrap();
        let bar = output.find(" bar  (").unwrap();
        let foo = output.find(" foo  (").unwrap();
        assert!(baz < bar && bar < foo);
        assert!(output.contains("    4   Open handlers folder"));
        assert!(output.contains("    6   (submenu: Open with)"));
        assert!(output.ends_with("3 handler(s), 6 command id(s) used\n"));
    }

    #[test]
    fn describe_shows_the_command_line() {
        let request = LaunchRequest {
            program: PathBuf::from("/h/viewer"),
            arguments: vec!["/w/a.txt".into()],
            verb: Verb::RunElevated,
        };
        assert_eq!(describe(&request), r#"runas /h/viewer "/w/a.txt""#);
    }
}
