mod forms;
mod render;

use anyhow::bail;
use clap::{Parser, Subcommand};
use clinic_core::{
    AuthIntent, ClinicConfig, ClinicStores, Entity, EntityIntent, EntityStore, ListStore, LoadList,
    Outcome, Resource,
};
use forms::{DoctorForm, PatientForm, RecordForm, VisitForm};
use render::Tabular;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic dashboards in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Doctors dashboard
    Doctors {
        #[command(subcommand)]
        action: DoctorCommand,
    },
    /// Patients dashboard
    Patients {
        #[command(subcommand)]
        action: PatientCommand,
    },
    /// Visits dashboard
    Visits {
        #[command(subcommand)]
        action: VisitCommand,
    },
    /// Fee schedule
    Fees {
        #[command(subcommand)]
        action: ListCommand,
    },
    /// Activity log
    Activity {
        #[command(subcommand)]
        action: ListCommand,
    },
    /// Sign in and keep the session for later commands
    Login {
        email: String,
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
}

#[derive(Subcommand)]
enum DoctorCommand {
    /// List every doctor
    List {
        /// Ignore the cache window
        #[arg(long)]
        force: bool,
    },
    /// Show one doctor
    Show { id: i64 },
    /// Add a doctor
    Add(DoctorForm),
    /// Change a doctor; only the given flags are updated
    Edit {
        id: i64,
        #[command(flatten)]
        form: DoctorForm,
    },
    /// Remove a doctor
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum PatientCommand {
    /// List every patient
    List {
        /// Ignore the cache window
        #[arg(long)]
        force: bool,
    },
    /// Show one patient
    Show { id: i64 },
    /// Add a patient
    Add(PatientForm),
    /// Change a patient; only the given flags are updated
    Edit {
        id: i64,
        #[command(flatten)]
        form: PatientForm,
    },
    /// Remove a patient
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum VisitCommand {
    /// List every visit
    List {
        /// Ignore the cache window
        #[arg(long)]
        force: bool,
    },
    /// Show one visit
    Show { id: i64 },
    /// Record a visit
    Add(VisitForm),
    /// Change a visit; only the given flags are updated
    Edit {
        id: i64,
        #[command(flatten)]
        form: VisitForm,
    },
    /// Remove a visit
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ListCommand {
    /// List every entry
    List {
        /// Ignore the cache window
        #[arg(long)]
        force: bool,
    },
}

/// One dashboard action, independent of the entity it targets.
enum EntityAction<F> {
    List { force: bool },
    Show(i64),
    Add(F),
    Edit(i64, F),
    Delete(i64),
}

impl From<DoctorCommand> for EntityAction<DoctorForm> {
    fn from(command: DoctorCommand) -> Self {
        match command {
            DoctorCommand::List { force } => EntityAction::List { force },
            DoctorCommand::Show { id } => EntityAction::Show(id),
            DoctorCommand::Add(form) => EntityAction::Add(form),
            DoctorCommand::Edit { id, form } => EntityAction::Edit(id, form),
            DoctorCommand::Delete { id } => EntityAction::Delete(id),
        }
    }
}

impl From<PatientCommand> for EntityAction<PatientForm> {
    fn from(command: PatientCommand) -> Self {
        match command {
            PatientCommand::List { force } => EntityAction::List { force },
            PatientCommand::Show { id } => EntityAction::Show(id),
            PatientCommand::Add(form) => EntityAction::Add(form),
            PatientCommand::Edit { id, form } => EntityAction::Edit(id, form),
            PatientCommand::Delete { id } => EntityAction::Delete(id),
        }
    }
}

impl From<VisitCommand> for EntityAction<VisitForm> {
    fn from(command: VisitCommand) -> Self {
        match command {
            VisitCommand::List { force } => EntityAction::List { force },
            VisitCommand::Show { id } => EntityAction::Show(id),
            VisitCommand::Add(form) => EntityAction::Add(form),
            VisitCommand::Edit { id, form } => EntityAction::Edit(id, form),
            VisitCommand::Delete { id } => EntityAction::Delete(id),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("clinic=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = ClinicConfig::from_env_values(
        std::env::var("CLINIC_API_URL").ok(),
        std::env::var("CLINIC_SESSION_DIR").ok(),
        std::env::var("CLINIC_CACHE_TTL_SECS").ok(),
        std::env::var("CLINIC_HTTP_TIMEOUT_SECS").ok(),
    )?;
    let stores = api_client::connect(&cfg)?;

    match cli.command {
        Commands::Doctors { action } => run_entity(&stores.doctors, action.into()).await,
        Commands::Patients { action } => run_entity(&stores.patients, action.into()).await,
        Commands::Visits { action } => run_entity(&stores.visits, action.into()).await,
        Commands::Fees {
            action: ListCommand::List { force },
        } => run_list(&stores.fees, force).await,
        Commands::Activity {
            action: ListCommand::List { force },
        } => run_list(&stores.activity, force).await,
        Commands::Login { email, password } => {
            let outcome = stores
                .auth
                .dispatch(AuthIntent::Login {
                    email: email.clone(),
                    password,
                })
                .await;
            settled(&format!("Login as {}", email), outcome)?;
            if stores.auth.is_authenticated() {
                println!("Signed in as {}", email);
            } else {
                println!("Login accepted without a token; requests stay anonymous");
            }
            Ok(())
        }
        Commands::Logout => {
            settled("Logout", stores.auth.dispatch(AuthIntent::Logout).await)?;
            println!("Signed out");
            Ok(())
        }
        Commands::Whoami => {
            whoami(&stores);
            Ok(())
        }
    }
}

/// Runs one dashboard action after the initial load every dashboard performs.
async fn run_entity<E, F>(store: &EntityStore<E>, action: EntityAction<F>) -> anyhow::Result<()>
where
    E: Entity + Tabular,
    F: RecordForm<E>,
{
    let force = matches!(action, EntityAction::List { force: true });
    let loaded = settled(
        &format!("Loading {}", E::PLURAL),
        store.dispatch(EntityIntent::LoadAll { force }).await,
    );

    match action {
        EntityAction::List { .. } => {
            loaded?;
            let rows = store.select_all();
            if rows.is_empty() {
                println!("No {} found.", E::PLURAL);
            } else {
                println!("{}", render::table(&rows));
            }
            println!(
                "{} {} ({})",
                store.count(),
                E::PLURAL,
                render::freshness(store.last_fetched())
            );
        }
        EntityAction::Show(id) => {
            settled(
                &format!("Loading {} {}", E::SINGULAR, id),
                store.dispatch(EntityIntent::LoadById(id)).await,
            )?;
            match store.select_by_id(id) {
                Some(row) => println!("{}", render::details(&row)),
                None => println!("No {} with id {}", E::SINGULAR, id),
            }
        }
        EntityAction::Add(form) => {
            let record = form.create()?;
            settled(
                &format!("Adding {}", E::SINGULAR),
                store.dispatch(EntityIntent::Create(record)).await,
            )?;
            println!("Added {} ({} total)", E::SINGULAR, store.count());
        }
        EntityAction::Edit(id, form) => {
            let existing = match store.select_by_id(id) {
                Some(row) => row,
                None => {
                    settled(
                        &format!("Loading {} {}", E::SINGULAR, id),
                        store.dispatch(EntityIntent::LoadById(id)).await,
                    )?;
                    match store.select_by_id(id) {
                        Some(row) => row,
                        None => bail!("No {} with id {}", E::SINGULAR, id),
                    }
                }
            };
            let record = form.apply(existing)?;
            settled(
                &format!("Updating {} {}", E::SINGULAR, id),
                store.dispatch(EntityIntent::Update(record)).await,
            )?;
            println!("Updated {} {}", E::SINGULAR, id);
        }
        EntityAction::Delete(id) => {
            settled(
                &format!("Deleting {} {}", E::SINGULAR, id),
                store.dispatch(EntityIntent::Delete(id)).await,
            )?;
            println!("Deleted {} {} ({} left)", E::SINGULAR, id, store.count());
        }
    }
    Ok(())
}

async fn run_list<T>(store: &ListStore<T>, force: bool) -> anyhow::Result<()>
where
    T: Resource + Tabular,
{
    settled(
        &format!("Loading {}", T::PLURAL),
        store.dispatch(LoadList::new(force)).await,
    )?;
    let rows = store.data();
    if rows.is_empty() {
        println!("No {} found.", T::PLURAL);
    } else {
        println!("{}", render::table(&rows));
    }
    Ok(())
}

fn whoami(stores: &ClinicStores) {
    let session = stores.auth.session();
    match (session.is_authenticated, session.user_email) {
        (true, Some(email)) => {
            let role = session
                .role
                .map(|r| r.to_string())
                .unwrap_or_else(|| "no role".into());
            println!("{} ({})", email, role);
        }
        _ => println!("Not signed in"),
    }
}

/// Logs a failed dispatch and turns it into an error carrying the store's message.
fn settled(what: &str, outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Failed(message) => {
            tracing::warn!("{} failed: {}", what, message);
            bail!(message)
        }
        _ => Ok(()),
    }
}
