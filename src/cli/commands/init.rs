use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::store::EventStore;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the event database and its schema
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing rpeetracker…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let store = EventStore::open(&db_path)?;
    success(format!("Database initialized at {}", &db_path));

    log::ttlog_or_warn(
        store.conn(),
        "init",
        "database",
        &format!("Database initialized at {}", &db_path),
    );

    Ok(())
}
