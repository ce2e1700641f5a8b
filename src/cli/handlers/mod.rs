use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::kv::KvStore;
use crate::io::paths::DataDir;
use crate::model::catalog::{Catalog, Category};
use crate::model::config::TrackerConfig;
use crate::ops::filter::{self, ItemQuery, ItemView, StateFilter};
use crate::ops::progress::ProgressStore;
use crate::ops::stats;

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

/// The catalog and the progress store, loaded once per command
struct Session {
    catalog: Catalog,
    store: ProgressStore,
}

impl Session {
    fn open(data_dir: &DataDir) -> Result<Self, Box<dyn std::error::Error>> {
        let catalog = Catalog::builtin()?;
        let kv = KvStore::open_file(&data_dir.progress_path())?;
        Ok(Session {
            catalog,
            store: ProgressStore::new(kv),
        })
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, data_dir: DataDir) -> HandlerResult {
    let json = cli.json;

    let cmd = match cli.command {
        Some(cmd) => cmd,
        None => return Err("no subcommand given".into()),
    };

    match cmd {
        // Config commands don't need the store
        Commands::Config(args) => cmd_config(args, &data_dir, json),

        Commands::Categories => cmd_categories(&Session::open(&data_dir)?, json),
        Commands::List(args) => cmd_list(&Session::open(&data_dir)?, args, json),
        Commands::Show(args) => cmd_show(&Session::open(&data_dir)?, args, json),
        Commands::Stats(args) => cmd_stats(&Session::open(&data_dir)?, args, json),
        Commands::Achievements => cmd_achievements(&Session::open(&data_dir)?, json),

        Commands::Advance(args) => cmd_advance(&mut Session::open(&data_dir)?, args, json),
        Commands::Set(args) => cmd_set(&mut Session::open(&data_dir)?, args, json),
        Commands::Reset(args) => cmd_reset(&mut Session::open(&data_dir)?, args, json),
        Commands::Name(args) => cmd_name(&mut Session::open(&data_dir)?, args, json),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> HandlerResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Look up an item and its current state
fn lookup<'a>(
    session: &'a Session,
    category: &str,
    item: &str,
) -> Result<(&'a Category, ItemView<'a>), Box<dyn std::error::Error>> {
    let category = session.catalog.category(category)?;
    let (group, item) = category.find_item(item)?;
    let state = session.store.get(&category.id, &item.id);
    Ok((category, ItemView { group, item, state }))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_categories(session: &Session, json: bool) -> HandlerResult {
    let all: Vec<_> = session
        .catalog
        .categories
        .values()
        .map(|c| stats::category_stats(c, &session.store))
        .collect();

    if json {
        let out: Vec<CategoryJson> = all.iter().map(category_to_json).collect();
        return print_json(&out);
    }
    for s in &all {
        println!(
            "{:<10} {:<20} {:>3}/{:<3} {:>3}%",
            s.id,
            s.name,
            s.counts.complete,
            s.total(),
            s.percent_complete()
        );
    }
    Ok(())
}

fn cmd_list(session: &Session, args: ListArgs, json: bool) -> HandlerResult {
    let category = session.catalog.category(&args.category)?;
    let query = ItemQuery {
        filter: match &args.state {
            Some(s) => StateFilter::parse(s, category)?,
            None => StateFilter::All,
        },
        group: args.group,
        search: args.search.as_deref().and_then(filter::search_regex),
    };
    let items = filter::filter_items(category, &session.store, &query)?;

    if json {
        return print_json(&ItemListJson {
            category: category.id.clone(),
            items: items.iter().map(|v| item_to_json(category, v, false)).collect(),
        });
    }

    let id_width = items.iter().map(|v| v.item.id.len()).max().unwrap_or(0);
    let mut current_group: Option<&str> = None;
    for view in &items {
        if current_group != Some(view.group.id.as_str()) {
            if current_group.is_some() {
                println!();
            }
            println!("{}", view.group.name);
            current_group = Some(view.group.id.as_str());
        }
        println!("  {}", format_item_line(category, view, id_width));
    }
    if items.is_empty() {
        println!("no matching items");
    }
    Ok(())
}

fn cmd_show(session: &Session, args: ItemArgs, json: bool) -> HandlerResult {
    let (category, view) = lookup(session, &args.category, &args.item)?;
    if json {
        return print_json(&item_to_json(category, &view, true));
    }
    print!("{}", format_item_detail(category, &view));
    Ok(())
}

fn cmd_stats(session: &Session, args: StatsArgs, json: bool) -> HandlerResult {
    let categories: Vec<&Category> = match &args.category {
        Some(id) => vec![session.catalog.category(id)?],
        None => session.catalog.categories.values().collect(),
    };
    let player = session.store.player_name();

    let mut entries = Vec::new();
    for category in categories {
        let s = stats::category_stats(category, &session.store);
        let summary = stats::summary_line(&player, &s);
        entries.push((category, s, summary));
    }

    if json {
        let out = StatsJson {
            player,
            categories: entries
                .into_iter()
                .map(|(_, s, summary)| CategoryStatsJson {
                    total: s.total(),
                    percent: s.percent_complete(),
                    stats: s,
                    summary,
                })
                .collect(),
        };
        return print_json(&out);
    }

    for (i, (category, s, summary)) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_stats(category, s, summary));
    }
    Ok(())
}

fn cmd_achievements(session: &Session, json: bool) -> HandlerResult {
    let statuses = stats::evaluate_achievements(&session.catalog, &session.store);
    if json {
        return print_json(&statuses);
    }
    for a in &statuses {
        println!("{}", format_achievement_line(a));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_advance(session: &mut Session, args: ItemArgs, json: bool) -> HandlerResult {
    let (category_id, item_id) = {
        let (category, view) = lookup(session, &args.category, &args.item)?;
        (category.id.clone(), view.item.id.clone())
    };
    session.store.advance(&category_id, &item_id)?;

    let (category, view) = lookup(session, &category_id, &item_id)?;
    if json {
        return print_json(&item_to_json(category, &view, false));
    }
    println!("{}", format_item_line(category, &view, 0));
    Ok(())
}

fn cmd_set(session: &mut Session, args: SetArgs, json: bool) -> HandlerResult {
    let (category_id, item_id, state) = {
        let (category, view) = lookup(session, &args.category, &args.item)?;
        let state = category.parse_state(&args.state)?;
        (category.id.clone(), view.item.id.clone(), state)
    };
    session.store.set(&category_id, &item_id, state)?;

    let (category, view) = lookup(session, &category_id, &item_id)?;
    if json {
        return print_json(&item_to_json(category, &view, false));
    }
    println!("{}", format_item_line(category, &view, 0));
    Ok(())
}

fn cmd_reset(session: &mut Session, args: ResetArgs, json: bool) -> HandlerResult {
    let category_id = session.catalog.category(&args.category)?.id.clone();
    if !args.yes {
        return Err(format!(
            "this clears all {} progress; re-run with --yes to confirm",
            category_id
        )
        .into());
    }
    let removed = session.store.reset(&category_id)?;
    if json {
        return print_json(&ResetJson {
            category: category_id,
            removed,
        });
    }
    println!("cleared {} {} entries", removed, category_id);
    Ok(())
}

fn cmd_name(session: &mut Session, args: NameArgs, json: bool) -> HandlerResult {
    if let Some(name) = args.name {
        let name = name.trim();
        if name.is_empty() {
            return Err("name cannot be empty".into());
        }
        session.store.set_player_name(name)?;
    }
    let name = session.store.player_name();
    if json {
        return print_json(&NameJson { name });
    }
    println!("{}", name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, data_dir: &DataDir, json: bool) -> HandlerResult {
    let config_path = data_dir.config_path();
    match args.action {
        ConfigAction::Show => {
            let config: TrackerConfig = config_io::read_config(&config_path)?;
            if json {
                return print_json(&config);
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut doc = config_io::read_config_doc(&config_path)?;
            config_io::set_value(&mut doc, &key, &value)?;
            // Validate the edited document before writing it
            let _: TrackerConfig = toml::from_str(&doc.to_string())?;
            config_io::write_config_doc(&config_path, &doc)?;
            tracing::info!(key = %key, value = %value, "config updated");
            if !json {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Path => {
            if json {
                return print_json(&serde_json::json!({
                    "data_dir": data_dir.root(),
                    "progress": data_dir.progress_path(),
                    "config": config_path,
                    "log": data_dir.log_path(),
                }));
            }
            println!("data dir: {}", data_dir.root().display());
            println!("progress: {}", data_dir.progress_path().display());
            println!("config:   {}", config_path.display());
            println!("log:      {}", data_dir.log_path().display());
        }
    }
    Ok(())
}
