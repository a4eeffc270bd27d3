//! CLI argument parsing with clap

use clap::Parser;

use strapi_generate_new::database::DatabaseArgs;
use strapi_generate_new::scope::CreateOptions;

/// create-strapi-app - Scaffold a new Strapi application
#[derive(Parser, Debug)]
#[command(name = "create-strapi-app")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to create the application in
    pub directory: String,

    /// Do not start the application after a quickstart creation
    #[arg(long = "no-run")]
    pub no_run: bool,

    /// Enable debug mode
    #[arg(long)]
    pub debug: bool,

    /// Quickstart the creation (default database settings, run afterwards)
    #[arg(long)]
    pub quickstart: bool,

    /// Database client (sqlite, postgres, mysql, mongo)
    #[arg(long)]
    pub dbclient: Option<String>,

    /// Database host
    #[arg(long)]
    pub dbhost: Option<String>,

    /// Database port
    #[arg(long)]
    pub dbport: Option<String>,

    /// Database name
    #[arg(long)]
    pub dbname: Option<String>,

    /// Database username
    #[arg(long)]
    pub dbusername: Option<String>,

    /// Database password
    #[arg(long)]
    pub dbpassword: Option<String>,

    /// Database file path, for sqlite
    #[arg(long)]
    pub dbfile: Option<String>,

    /// Authentication database, for mongo
    #[arg(long)]
    pub dbauth: Option<String>,

    /// Enable SSL for the database connection
    #[arg(long)]
    pub dbssl: Option<bool>,

    /// Overwrite an existing database configuration
    #[arg(long)]
    pub dbforce: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Fold the parsed arguments into the orchestrator's options record
    pub fn create_options(&self) -> CreateOptions {
        CreateOptions {
            // Only an explicit --no-run disables the quickstart run.
            run: if self.no_run { Some(false) } else { None },
            debug: self.debug,
            quickstart: self.quickstart,
            database: DatabaseArgs {
                client: self.dbclient.clone(),
                host: self.dbhost.clone(),
                port: self.dbport.clone(),
                name: self.dbname.clone(),
                username: self.dbusername.clone(),
                password: self.dbpassword.clone(),
                file: self.dbfile.clone(),
                auth: self.dbauth.clone(),
                ssl: self.dbssl,
                force: self.dbforce,
            },
        }
    }
}
