//! Carehub CLI
//!
//! Command-line front end for the care-facility services:
//! - Sign in, sign out and register accounts
//! - Show each role's dashboard
//! - Manage residents, appointments, receipts and users
//! - Read notifications and keep the food log

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use carehub::api::{health, ApiClient};
use carehub::cache::{
    FoodLog, NotificationCache, NotificationFilter, PaymentRequests, ResidentProfiles, StatusFilter,
};
use carehub::config::{generate_default_config, Config};
use carehub::logging;
use carehub::models::{
    Address, Appointment, FoodEntryUpdate, MealType, NotificationDraft, NotificationKind,
};
use carehub::output::{self, OutputFormat, Tabular};
use carehub::routing::{home_for, role_guard, Access, Role};
use carehub::storage::{CurrentUser, LocalStore, Session};
use carehub::validation::{
    rules, AppointmentForm, CarerForm, DoctorForm, FamilyMemberForm, FoodEntryForm, LoginForm,
    PaymentRequestForm, ReceiptForm, RegisterForm, ResidentForm, ValidationErrors,
};
use carehub::workflows;

#[derive(Parser)]
#[command(name = "carehub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Care-facility coordination client")]
#[command(long_about = "Carehub talks to the care-facility microservices.\nFamily members, carers, doctors and developers each get their own dashboard and commands.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Gateway URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        /// Account email
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create an account and its role records
    Register(RegisterArgs),

    /// Show the dashboard for the signed-in role
    Dashboard {
        /// Doctor whose agenda to show (default: the signed-in account)
        #[arg(long)]
        doctor_id: Option<i64>,
    },

    /// Residents of the facility
    Residents {
        #[command(subcommand)]
        action: ResidentCommand,
    },

    /// Medical appointments
    Appointments {
        #[command(subcommand)]
        action: AppointmentCommand,
    },

    /// Receipts and payments
    Receipts {
        #[command(subcommand)]
        action: ReceiptCommand,
    },

    /// Notifications for the signed-in user
    Notifications {
        #[command(subcommand)]
        action: NotificationCommand,
    },

    /// Food log
    Food {
        #[command(subcommand)]
        action: FoodCommand,
    },

    /// Resident profiles saved at registration on this device
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Doctor profiles
    Doctors {
        #[command(subcommand)]
        action: DoctorCommand,
    },

    /// Carer profiles
    Carers {
        #[command(subcommand)]
        action: CarerCommand,
    },

    /// Family member profiles
    FamilyMembers {
        #[command(subcommand)]
        action: FamilyMemberCommand,
    },

    /// IAM accounts
    Users,

    /// IAM roles
    Roles,

    /// Probe every service
    Health,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Defaults to the password
    #[arg(long)]
    confirm_password: Option<String>,
    /// familiar, cuidador or doctor
    #[arg(long)]
    role: Role,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    relationship: Option<String>,
    #[arg(long)]
    resident_name: Option<String>,
    #[arg(long)]
    resident_age: Option<String>,
    #[arg(long)]
    resident_birth_date: Option<String>,
    #[arg(long)]
    resident_condition: Option<String>,
    #[arg(long)]
    license_number: Option<String>,
    #[arg(long)]
    specialty: Option<String>,
    #[arg(long)]
    dni: Option<String>,
}

impl RegisterArgs {
    fn into_form(self) -> RegisterForm {
        RegisterForm {
            confirm_password: self.confirm_password.unwrap_or_else(|| self.password.clone()),
            name: self.name,
            email: self.email,
            password: self.password,
            role: Some(self.role),
            phone: self.phone.unwrap_or_default(),
            relationship: self.relationship.unwrap_or_default(),
            resident_name: self.resident_name.unwrap_or_default(),
            resident_age: self.resident_age.unwrap_or_default(),
            resident_birth_date: self.resident_birth_date.unwrap_or_default(),
            resident_condition: self.resident_condition.unwrap_or_default(),
            license_number: self.license_number.unwrap_or_default(),
            specialty: self.specialty.unwrap_or_default(),
            dni: self.dni.unwrap_or_default(),
        }
    }
}

#[derive(Args)]
pub struct AddressArgs {
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip_code: Option<String>,
    #[arg(long)]
    country: Option<String>,
}

impl From<AddressArgs> for Address {
    fn from(args: AddressArgs) -> Self {
        Address {
            street: args.street,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            country: args.country,
        }
    }
}

#[derive(Subcommand)]
pub enum ResidentCommand {
    /// List residents
    List,
    /// Show one resident
    Get { id: i64 },
    /// Show a resident's details
    Details { id: i64 },
    /// Find a resident by DNI
    Search { dni: String },
    /// Create a resident
    Create(ResidentArgs),
    /// Replace a resident
    Update {
        id: i64,
        #[command(flatten)]
        fields: ResidentArgs,
    },
    /// Delete a resident
    Delete { id: i64 },
}

#[derive(Args)]
pub struct ResidentArgs {
    #[arg(long)]
    dni: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// YYYY-MM-DD
    #[arg(long)]
    birth_date: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[command(flatten)]
    address: AddressArgs,
}

impl ResidentArgs {
    fn into_form(self) -> ResidentForm {
        ResidentForm {
            dni: self.dni,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            address: self.address.into(),
        }
    }
}

#[derive(Subcommand)]
pub enum AppointmentCommand {
    /// List appointments
    List {
        /// Only this resident's appointments
        #[arg(long)]
        resident: Option<i64>,
        /// Only this doctor's appointments
        #[arg(long, conflicts_with = "resident")]
        doctor: Option<i64>,
    },
    /// Show one appointment
    Get { id: i64 },
    /// Schedule an appointment
    Create(AppointmentArgs),
    /// Replace an appointment
    Update {
        id: i64,
        #[command(flatten)]
        fields: AppointmentArgs,
    },
    /// Cancel and delete an appointment
    Delete { id: i64 },
    /// Accept an appointment request (doctors)
    Accept { id: i64 },
    /// Reject an appointment request (doctors)
    Reject { id: i64 },
}

#[derive(Args)]
pub struct AppointmentArgs {
    #[arg(long)]
    resident_id: String,
    #[arg(long)]
    doctor_id: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// HH:MM
    #[arg(long)]
    time: String,
    /// Default: SCHEDULED
    #[arg(long)]
    status: Option<String>,
}

impl AppointmentArgs {
    fn into_form(self) -> AppointmentForm {
        AppointmentForm {
            resident_id: self.resident_id,
            doctor_id: self.doctor_id,
            date: self.date,
            time: self.time,
            status: self.status.unwrap_or_default(),
        }
    }
}

#[derive(Subcommand)]
pub enum ReceiptCommand {
    /// List receipts
    List {
        /// Only this resident's receipts
        #[arg(long)]
        resident: Option<i64>,
    },
    /// Show one receipt
    Get { id: i64 },
    /// Issue a receipt
    Create(ReceiptArgs),
    /// Replace a receipt
    Update {
        id: i64,
        #[command(flatten)]
        fields: ReceiptArgs,
    },
    /// Delete a receipt
    Delete { id: i64 },
    /// List payment requests kept on this device
    Requests,
    /// Ask a family member to pay (carers)
    Request {
        /// Family member asked to pay
        #[arg(long)]
        payer_id: String,
        /// Billing period, e.g. "Nov, 2025"
        #[arg(long)]
        period: String,
        #[arg(long)]
        concept: String,
        /// Amount as shown to the family member
        #[arg(long)]
        amount: String,
    },
    /// Settle a payment request (family members)
    MarkPaid {
        id: String,
        /// Link to the payment receipt
        #[arg(long)]
        receipt_url: Option<String>,
    },
    /// Withdraw a payment request (carers)
    CancelRequest { id: String },
}

#[derive(Args)]
pub struct ReceiptArgs {
    #[arg(long)]
    resident_id: String,
    #[arg(long)]
    total_amount: String,
    /// YYYY-MM-DD
    #[arg(long)]
    issue_date: String,
    /// YYYY-MM-DD
    #[arg(long)]
    due_date: String,
    /// Receipt type, e.g. MONTHLY
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    paid: bool,
}

impl ReceiptArgs {
    fn into_form(self) -> ReceiptForm {
        ReceiptForm {
            resident_id: self.resident_id,
            total_amount: self.total_amount,
            issue_date: self.issue_date,
            due_date: self.due_date,
            kind: self.kind.unwrap_or_default(),
            paid: self.paid,
        }
    }
}

#[derive(Subcommand)]
pub enum NotificationCommand {
    /// Fetch and list notifications
    List {
        /// all, active, unread, read or archived
        #[arg(long, default_value = "active")]
        status: StatusFilter,
        #[arg(long = "type")]
        kind: Option<NotificationKind>,
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,
        /// Every user's notifications (developers only)
        #[arg(long)]
        all: bool,
        /// Use the local copy without contacting the service
        #[arg(long)]
        offline: bool,
    },
    /// Send a notification
    Send {
        /// Recipient user id
        recipient: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: Option<String>,
        #[arg(long = "type")]
        kind: Option<NotificationKind>,
        /// Keep it on this device only
        #[arg(long)]
        local: bool,
    },
    /// Mark a notification as read
    Read {
        id: String,
        #[arg(long)]
        local: bool,
    },
    /// Archive a notification
    Archive { id: String },
    /// Move a notification back to the inbox
    Unarchive { id: String },
    /// Delete a notification
    Delete {
        id: String,
        #[arg(long)]
        local: bool,
    },
    /// Number of unread notifications in the local copy
    Unread,
    /// Drop the local copy
    Clear,
}

#[derive(Subcommand)]
pub enum FoodCommand {
    /// List food entries
    List {
        /// Only entries for this profile
        #[arg(long)]
        target: Option<String>,
        /// Only this resident's entries (service only)
        #[arg(long, requires = "remote")]
        resident: Option<i64>,
        /// Read from the food service instead of the local log
        #[arg(long)]
        remote: bool,
    },
    /// Record a meal
    Add {
        /// BREAKFAST, LUNCH, DINNER or SNACK
        meal: String,
        description: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// HH:MM (default: now)
        #[arg(long)]
        time: Option<String>,
        /// Profile the entry belongs to (default: the selected profile)
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        resident_id: Option<String>,
        #[arg(long)]
        remote: bool,
    },
    /// Change a food entry
    Update {
        id: String,
        #[arg(long)]
        meal: Option<MealType>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        remote: bool,
    },
    /// Delete a food entry
    Delete {
        id: String,
        #[arg(long)]
        remote: bool,
    },
    /// Empty the local log
    Clear,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show the selected profile
    Show,
    /// List saved profiles
    List,
    /// Select a profile
    Use { id: String },
    /// Delete a saved profile
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum DoctorCommand {
    /// List doctors
    List,
    /// Show one doctor
    Get { id: i64 },
    /// Create a doctor
    Create(DoctorArgs),
    /// Replace a doctor
    Update {
        id: i64,
        #[command(flatten)]
        fields: DoctorArgs,
    },
    /// Delete a doctor
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum CarerCommand {
    /// List carers
    List,
    /// Show one carer
    Get { id: i64 },
    /// Create a carer
    Create(CarerArgs),
    /// Replace a carer
    Update {
        id: i64,
        #[command(flatten)]
        fields: CarerArgs,
    },
    /// Delete a carer
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum FamilyMemberCommand {
    /// List family members
    List,
    /// Show one family member
    Get { id: i64 },
    /// Create a family member
    Create(FamilyMemberArgs),
    /// Replace a family member
    Update {
        id: i64,
        #[command(flatten)]
        fields: FamilyMemberArgs,
    },
    /// Delete a family member
    Delete { id: i64 },
}

#[derive(Args)]
pub struct DoctorArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    license_number: String,
    #[arg(long)]
    specialty: String,
    #[arg(long)]
    phone: Option<String>,
    #[command(flatten)]
    address: AddressArgs,
}

impl DoctorArgs {
    fn into_form(self) -> DoctorForm {
        DoctorForm {
            first_name: self.first_name,
            last_name: self.last_name,
            license_number: self.license_number,
            specialty: self.specialty,
            phone: self.phone.unwrap_or_default(),
            address: self.address.into(),
        }
    }
}

#[derive(Args)]
pub struct CarerArgs {
    #[arg(long)]
    dni: String,
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: Option<String>,
}

impl CarerArgs {
    fn into_form(self) -> CarerForm {
        CarerForm {
            dni: self.dni,
            full_name: self.full_name,
            email: self.email,
            password: self.password.unwrap_or_default(),
        }
    }
}

#[derive(Args)]
pub struct FamilyMemberArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    relationship: String,
    #[arg(long)]
    linked_resident_id: String,
}

impl FamilyMemberArgs {
    fn into_form(self) -> FamilyMemberForm {
        FamilyMemberForm {
            first_name: self.first_name,
            last_name: self.last_name.unwrap_or_default(),
            relationship: self.relationship,
            linked_resident_id: self.linked_resident_id,
        }
    }
}

/// Staff allowed to manage residents and appointments
const STAFF: &[Role] = &[Role::Carer, Role::Doctor, Role::Developer];

struct App {
    client: ApiClient,
    session: Session,
    format: OutputFormat,
}

impl App {
    fn store(&self) -> Arc<LocalStore> {
        self.session.store().clone()
    }

    /// Signed-in user, if their role is one of `allowed`
    fn require(&self, allowed: &[Role]) -> Result<CurrentUser> {
        let user = self.session.current_user();
        let permitted = allowed
            .iter()
            .any(|role| role_guard(user.as_ref(), *role) == Access::Allow);
        match user {
            None => bail!("Not signed in. Run `carehub login <email>` first"),
            Some(user) if permitted => Ok(user),
            Some(user) => bail!(
                "This command is not available to {} accounts (home: {})",
                user.role,
                home_for(user.role)
            ),
        }
    }

    fn print<T: Tabular + Serialize>(&self, items: &[T]) -> Result<()> {
        println!("{}", output::render(items, self.format)?);
        Ok(())
    }

    fn print_one<T: Tabular + Serialize>(&self, item: &T) -> Result<()> {
        println!("{}", output::render_one(item, self.format)?);
        Ok(())
    }

    fn print_summary<T: Serialize>(&self, value: &T, pairs: &[(&str, String)]) -> Result<()> {
        println!("{}", output::render_summary(value, pairs, self.format)?);
        Ok(())
    }

    /// Summary followed by a table, for dashboards
    fn print_dashboard<D: Serialize, T: Tabular + Serialize>(
        &self,
        dashboard: &D,
        pairs: &[(&str, String)],
        items: &[T],
    ) -> Result<()> {
        self.print_summary(dashboard, pairs)?;
        if self.format == OutputFormat::Table {
            println!();
            self.print(items)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_deref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => {
            let (config, skipped) = Config::load_default_reporting();
            for e in &skipped {
                eprintln!("Warning: {e}; falling back to defaults");
            }
            config
        }
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let dir = config.storage.resolved_dir();
    let store = Arc::new(
        LocalStore::open(&dir)
            .with_context(|| format!("Cannot open local storage in {}", dir.display()))?,
    );
    let client = ApiClient::new(&config.api, store.clone())?;
    let app = App {
        client,
        session: Session::new(store),
        format: cli.format,
    };

    match cli.command {
        Commands::Login { email, password } => {
            let form = LoginForm { email, password };
            let outcome = workflows::login(&app.client, &app.session, &form).await?;
            println!("Signed in as {} ({})", outcome.user.name, outcome.user.role);
            println!("Home: {}", outcome.home);
        }

        Commands::Logout => {
            app.session.logout()?;
            println!("Signed out");
        }

        Commands::Whoami => {
            let user = app.require(&Role::ALL)?;
            let mut pairs = vec![
                ("ID", user.id.to_string()),
                ("Name", user.name.clone()),
                ("Email", user.email.clone()),
                ("Role", user.role.to_string()),
                ("Home", home_for(user.role)),
            ];
            if let Some(id) = user.linked_resident_id {
                pairs.push(("Resident", id.to_string()));
            }
            app.print_summary(&user, &pairs)?;
        }

        Commands::Register(args) => {
            let form = args.into_form();
            let outcome = workflows::register(&app.client, &app.session, &form).await?;
            let steps: Vec<&str> = outcome.completed.iter().map(|s| s.describe()).collect();
            println!("Registered {} as {}", form.email.trim(), outcome.role);
            println!("Completed: {}", steps.join(", "));
            println!("Next: {}", outcome.redirect);
        }

        Commands::Dashboard { doctor_id } => dashboard(&app, doctor_id).await?,

        Commands::Residents { action } => residents(&app, action).await?,

        Commands::Appointments { action } => appointments(&app, action).await?,

        Commands::Receipts { action } => receipts(&app, action).await?,

        Commands::Notifications { action } => notifications(&app, action).await?,

        Commands::Food { action } => food(&app, action).await?,

        Commands::Profile { action } => profile(&app, action)?,

        Commands::Doctors { action } => doctors(&app, action).await?,

        Commands::Carers { action } => carers(&app, action).await?,

        Commands::FamilyMembers { action } => family_members(&app, action).await?,

        Commands::Users => {
            app.require(&[Role::Developer])?;
            app.print(&app.client.iam().users().await?)?;
        }

        Commands::Roles => {
            app.require(&[Role::Developer])?;
            app.print(&app.client.iam().roles().await?)?;
        }

        Commands::Health => {
            app.require(&[Role::Developer])?;
            app.print(&health::probe_all(&app.client).await)?;
        }

        Commands::Config { output } => write_config(output.as_deref())?,
    }

    Ok(())
}

fn write_config(output: Option<&Path>) -> Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

async fn dashboard(app: &App, doctor_id: Option<i64>) -> Result<()> {
    let user = app.require(&Role::ALL)?;
    let today = Local::now().date_naive();

    match user.role {
        Role::FamilyMember => {
            let d = workflows::family_dashboard(&app.client, &user, today).await?;
            let pairs = [
                ("Upcoming appointments", d.upcoming_appointments.len().to_string()),
                ("Notifications", d.notification_count.to_string()),
                ("Unread", d.unread_notifications.to_string()),
                ("Pending payments", d.pending_payments.to_string()),
                ("Pending amount", format!("{:.2}", d.pending_amount)),
            ];
            app.print_dashboard(&d, &pairs, &d.upcoming_appointments)
        }
        Role::Carer => {
            let d = workflows::carer_dashboard(&app.client, today).await?;
            let pairs = [
                ("Patients", d.patients.len().to_string()),
                ("Appointments today", d.appointments_today.to_string()),
            ];
            app.print_dashboard(&d, &pairs, &d.patients)
        }
        Role::Doctor => {
            let id = doctor_id.unwrap_or(user.id);
            let d = workflows::doctor_dashboard(&app.client, id, today).await?;
            let pairs = [
                ("Doctor", id.to_string()),
                ("Today", d.today.to_string()),
                ("Upcoming", d.upcoming.to_string()),
            ];
            app.print_dashboard(&d, &pairs, &d.appointments)
        }
        Role::Developer => {
            let d = workflows::developer_dashboard(&app.client).await;
            let pairs = [
                ("Healthy", d.healthy.to_string()),
                ("Failed", d.failed.to_string()),
            ];
            app.print_dashboard(&d, &pairs, &d.services)
        }
    }
}

async fn residents(app: &App, action: ResidentCommand) -> Result<()> {
    app.require(STAFF)?;
    let api = app.client.residents();

    match action {
        ResidentCommand::List => app.print(&api.list().await?),
        ResidentCommand::Get { id } => app.print_one(&api.get(id).await?),
        ResidentCommand::Details { id } => {
            let details = api.details(id).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
            Ok(())
        }
        ResidentCommand::Search { dni } => app.print_one(&api.search_by_dni(&dni).await?),
        ResidentCommand::Create(fields) => {
            let request = fields.into_form().to_request()?;
            app.print_one(&api.create(&request).await?)
        }
        ResidentCommand::Update { id, fields } => {
            let request = fields.into_form().to_request()?;
            app.print_one(&api.update(id, &request).await?)
        }
        ResidentCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Deleted resident {id}");
            Ok(())
        }
    }
}

async fn appointments(app: &App, action: AppointmentCommand) -> Result<()> {
    let api = app.client.appointments();

    match action {
        AppointmentCommand::List { resident, doctor } => {
            let user = app.require(&Role::ALL)?;
            let resident = match user.role {
                Role::FamilyMember => resident.or(user.linked_resident_id),
                _ => resident,
            };
            let items = match (resident, doctor) {
                (Some(id), _) => api.search_by_resident(id).await?,
                (None, Some(id)) => api.search_by_doctor(id).await?,
                (None, None) => api.list().await?,
            };
            app.print(&items)
        }
        AppointmentCommand::Get { id } => {
            app.require(&Role::ALL)?;
            app.print_one(&api.get(id).await?)
        }
        AppointmentCommand::Create(fields) => {
            app.require(STAFF)?;
            let request = fields.into_form().to_request()?;
            app.print_one(&api.create(&request).await?)
        }
        AppointmentCommand::Update { id, fields } => {
            app.require(STAFF)?;
            let request = fields.into_form().to_request()?;
            app.print_one(&api.update(id, &request).await?)
        }
        AppointmentCommand::Delete { id } => {
            app.require(STAFF)?;
            api.delete(id).await?;
            println!("Deleted appointment {id}");
            Ok(())
        }
        AppointmentCommand::Accept { id } => {
            app.require(&[Role::Doctor])?;
            app.print_one(&api.set_status(id, Appointment::ACCEPTED).await?)
        }
        AppointmentCommand::Reject { id } => {
            app.require(&[Role::Doctor])?;
            app.print_one(&api.set_status(id, Appointment::REJECTED).await?)
        }
    }
}

async fn receipts(app: &App, action: ReceiptCommand) -> Result<()> {
    let api = app.client.payments();

    match action {
        ReceiptCommand::List { resident } => {
            let user = app.require(&[Role::FamilyMember, Role::Carer, Role::Developer])?;
            let resident = match user.role {
                Role::FamilyMember => resident.or(user.linked_resident_id),
                _ => resident,
            };
            let items = match resident {
                Some(id) => api.by_resident(id).await?,
                None => api.list().await?,
            };
            app.print(&items)
        }
        ReceiptCommand::Get { id } => {
            app.require(&[Role::FamilyMember, Role::Carer, Role::Developer])?;
            app.print_one(&api.get(id).await?)
        }
        ReceiptCommand::Create(fields) => {
            app.require(&[Role::Carer, Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&api.create(&request).await?)
        }
        ReceiptCommand::Update { id, fields } => {
            app.require(&[Role::Carer, Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&api.update(id, &request).await?)
        }
        ReceiptCommand::Delete { id } => {
            app.require(&[Role::Carer, Role::Developer])?;
            api.delete(id).await?;
            println!("Deleted receipt {id}");
            Ok(())
        }
        ReceiptCommand::Requests => {
            let user = app.require(&[Role::FamilyMember, Role::Carer, Role::Developer])?;
            let requests = PaymentRequests::new(app.store());
            let items = match user.role {
                Role::FamilyMember => requests.for_payer(&user.id.to_string())?,
                _ => requests.all()?,
            };
            app.print(&items)
        }
        ReceiptCommand::Request {
            payer_id,
            period,
            concept,
            amount,
        } => {
            let user = app.require(&[Role::Carer])?;
            let form = PaymentRequestForm {
                period,
                concept,
                amount,
                payer_id,
            };
            let draft = form.to_draft(Some(user.name.clone()), Some(user.id.to_string()))?;
            let created = PaymentRequests::new(app.store()).create_request(draft)?;
            NotificationCache::new(app.store()).create(created.notice())?;
            app.print_one(&created)
        }
        ReceiptCommand::MarkPaid { id, receipt_url } => {
            let user = app.require(&[Role::FamilyMember])?;
            let requests = PaymentRequests::new(app.store());
            let payer_id = user.id.to_string();
            match requests.get(&id)? {
                Some(request) if request.payer_id.as_deref() == Some(payer_id.as_str()) => {}
                Some(_) => bail!("Payment request {id} is addressed to someone else"),
                None => bail!("No payment request {id}"),
            }
            let paid = requests
                .mark_paid(&id, receipt_url, Some(user.name.clone()), Some(payer_id))?
                .with_context(|| format!("No payment request {id}"))?;
            app.print_one(&paid)
        }
        ReceiptCommand::CancelRequest { id } => {
            app.require(&[Role::Carer])?;
            if !PaymentRequests::new(app.store()).delete(&id)? {
                bail!("No payment request {id}");
            }
            println!("Withdrew payment request {id}");
            Ok(())
        }
    }
}

async fn notifications(app: &App, action: NotificationCommand) -> Result<()> {
    let user = app.require(&Role::ALL)?;
    let api = app.client.notifications();
    let cache = NotificationCache::new(app.store());

    match action {
        NotificationCommand::List {
            status,
            kind,
            search,
            all,
            offline,
        } => {
            if !offline {
                let fetched = if all {
                    app.require(&[Role::Developer])?;
                    api.list().await?
                } else {
                    api.for_user(&user.id.to_string()).await?
                };
                let kept = cache.merge_remote(fetched)?;
                tracing::debug!(kept, "Kept local notices alongside the server list");
            }
            let mut filter = NotificationFilter::new().status(status);
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }
            if let Some(text) = search {
                filter = filter.text(text);
            }
            app.print(&filter.apply(&cache.all()?))
        }
        NotificationCommand::Send {
            recipient,
            title,
            message,
            kind,
            local,
        } => {
            let draft = NotificationDraft {
                title: Some(title),
                message,
                kind,
                user_id: Some(recipient.clone()),
                recipient_id: Some(recipient),
                sender: Some(user.name.clone()),
                ..NotificationDraft::default()
            };
            let created = if local {
                cache.create(draft)?
            } else {
                api.create(&draft).await?
            };
            app.print_one(&created)
        }
        NotificationCommand::Read { id, local } => {
            if !local {
                api.mark_as_read(&id).await?;
            }
            if !cache.mark_read(&id)? && local {
                bail!("No notification {id} on this device");
            }
            println!("Marked {id} as read");
            Ok(())
        }
        NotificationCommand::Archive { id } => {
            let updated = api.archive(&id).await?;
            cache.update_status(&id, updated.effective_status())?;
            app.print_one(&updated)
        }
        NotificationCommand::Unarchive { id } => {
            let updated = api.unarchive(&id).await?;
            cache.update_status(&id, updated.effective_status())?;
            app.print_one(&updated)
        }
        NotificationCommand::Delete { id, local } => {
            if !local {
                api.delete(&id).await?;
            }
            if !cache.delete(&id)? && local {
                bail!("No notification {id} on this device");
            }
            println!("Deleted notification {id}");
            Ok(())
        }
        NotificationCommand::Unread => {
            println!("{}", cache.unread_count()?);
            Ok(())
        }
        NotificationCommand::Clear => {
            cache.clear()?;
            println!("Local notifications cleared");
            Ok(())
        }
    }
}

async fn food(app: &App, action: FoodCommand) -> Result<()> {
    let user = app.require(&[Role::FamilyMember, Role::Carer])?;
    let api = app.client.food();
    let log = FoodLog::new(app.store());

    match action {
        FoodCommand::List {
            target,
            resident,
            remote,
        } => {
            let entries = match (remote, resident, target) {
                (true, Some(id), _) => api.by_resident(id).await?,
                (true, None, _) => api.list().await?,
                (false, _, Some(target)) => log.entries_for_target(&target)?,
                (false, _, None) => log.entries()?,
            };
            app.print(&entries)
        }
        FoodCommand::Add {
            meal,
            description,
            date,
            time,
            target,
            resident_id,
            remote,
        } => {
            let now = Local::now();
            let target = match target {
                Some(target) => Some(target),
                None if user.role == Role::FamilyMember => ResidentProfiles::new(app.store())
                    .current()?
                    .map(|p| p.resident.id),
                None => None,
            };
            let form = FoodEntryForm {
                meal,
                description,
                date: date.unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
                time: time.unwrap_or_else(|| now.format("%H:%M").to_string()),
                target_id: target.unwrap_or_default(),
                resident_id: resident_id.unwrap_or_default(),
            };
            let draft = form.to_draft(Some(user.name.clone()), Some(user.id.to_string()))?;
            let entry = if remote {
                api.create(&draft).await?
            } else {
                log.add(draft)?
            };
            app.print_one(&entry)
        }
        FoodCommand::Update {
            id,
            meal,
            description,
            date,
            time,
            remote,
        } => {
            let mut errors = ValidationErrors::new();
            if let Some(date) = &date {
                errors.check("date", rules::date(date));
            }
            if let Some(time) = &time {
                errors.check("time", rules::time(time));
            }
            errors.into_result()?;

            let changes = FoodEntryUpdate {
                meal,
                description,
                date,
                time,
                ..FoodEntryUpdate::default()
            };
            if changes.is_empty() {
                bail!("Nothing to update");
            }
            let entry = if remote {
                api.update(&id, &changes).await?
            } else {
                match log.update(&id, &changes)? {
                    Some(entry) => entry,
                    None => bail!("No food entry {id}"),
                }
            };
            app.print_one(&entry)
        }
        FoodCommand::Delete { id, remote } => {
            if remote {
                api.delete(&id).await?;
            } else if !log.delete(&id)? {
                bail!("No food entry {id}");
            }
            println!("Deleted food entry {id}");
            Ok(())
        }
        FoodCommand::Clear => {
            log.clear()?;
            println!("Food log cleared");
            Ok(())
        }
    }
}

fn profile(app: &App, action: ProfileCommand) -> Result<()> {
    app.require(&[Role::FamilyMember])?;
    let profiles = ResidentProfiles::new(app.store());

    match action {
        ProfileCommand::Show => match profiles.current()? {
            Some(profile) => app.print_one(&profile),
            None => bail!("No resident profile selected"),
        },
        ProfileCommand::List => app.print(&profiles.all()?),
        ProfileCommand::Use { id } => {
            if !profiles.set_current(&id)? {
                bail!("No resident profile {id}");
            }
            println!("Selected resident profile {id}");
            Ok(())
        }
        ProfileCommand::Delete { id } => {
            if !profiles.delete(&id)? {
                bail!("No resident profile {id}");
            }
            println!("Deleted resident profile {id}");
            Ok(())
        }
    }
}

async fn doctors(app: &App, action: DoctorCommand) -> Result<()> {
    let users = app.client.users();
    match action {
        DoctorCommand::List => {
            app.require(STAFF)?;
            app.print(&users.list_doctors().await?)
        }
        DoctorCommand::Get { id } => {
            app.require(STAFF)?;
            app.print_one(&users.get_doctor(id).await?)
        }
        DoctorCommand::Create(fields) => {
            app.require(&[Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&users.create_doctor(&request).await?)
        }
        DoctorCommand::Update { id, fields } => {
            app.require(&[Role::Doctor, Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&users.update_doctor(id, &request).await?)
        }
        DoctorCommand::Delete { id } => {
            app.require(&[Role::Developer])?;
            users.delete_doctor(id).await?;
            println!("Deleted doctor {id}");
            Ok(())
        }
    }
}

async fn carers(app: &App, action: CarerCommand) -> Result<()> {
    let users = app.client.users();
    match action {
        CarerCommand::List => {
            app.require(STAFF)?;
            app.print(&users.list_carers().await?)
        }
        CarerCommand::Get { id } => {
            app.require(STAFF)?;
            app.print_one(&users.get_carer(id).await?)
        }
        CarerCommand::Create(fields) => {
            app.require(&[Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&users.create_carer(&request).await?)
        }
        CarerCommand::Update { id, fields } => {
            app.require(&[Role::Carer, Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&users.update_carer(id, &request).await?)
        }
        CarerCommand::Delete { id } => {
            app.require(&[Role::Developer])?;
            users.delete_carer(id).await?;
            println!("Deleted carer {id}");
            Ok(())
        }
    }
}

async fn family_members(app: &App, action: FamilyMemberCommand) -> Result<()> {
    let users = app.client.users();
    match action {
        FamilyMemberCommand::List => {
            app.require(&[Role::Carer, Role::Developer])?;
            app.print(&users.list_family_members().await?)
        }
        FamilyMemberCommand::Get { id } => {
            app.require(&Role::ALL)?;
            app.print_one(&users.get_family_member(id).await?)
        }
        FamilyMemberCommand::Create(fields) => {
            app.require(&[Role::Carer, Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&users.create_family_member(&request).await?)
        }
        FamilyMemberCommand::Update { id, fields } => {
            app.require(&[Role::FamilyMember, Role::Developer])?;
            let request = fields.into_form().to_request()?;
            app.print_one(&users.update_family_member(id, &request).await?)
        }
        FamilyMemberCommand::Delete { id } => {
            app.require(&[Role::Developer])?;
            users.delete_family_member(id).await?;
            println!("Deleted family member {id}");
            Ok(())
        }
    }
}
