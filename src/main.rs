//! Diabetrack CLI
//!
//! Terminal front end for the diabetes API. Each subcommand is one screen;
//! each run restores the saved session once before the screen is shown.

use anyhow::{anyhow, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use diabetrack::api::{ApiClient, HealthApi};
use diabetrack::checklist::ChecklistTracker;
use diabetrack::classify::classify;
use diabetrack::config::{generate_default_config, Config};
use diabetrack::models::{MealContext, MedicationStatus};
use diabetrack::router::{nav_links, resolve, Route};
use diabetrack::session::{Session, SessionStore};
use diabetrack::storage::{ClientStorage, FileStorage};
use diabetrack::validation::{MealForm, MedicationForm, ReadingForm, SignupForm};
use diabetrack::views::{
    BmiState, DashboardView, LoginView, MealsView, MedicationsView, ProfileView, ReadingsView,
    SignupView, ViewError, NO_TIPS,
};

#[derive(Parser)]
#[command(name = "diabetrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track glucose readings, medications and meals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the local session file (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// type1, type2, gestational or prediabetes
        #[arg(long)]
        diabetes_type: Option<String>,
    },

    /// Log out and erase all local data
    Logout,

    /// Profile summary, BMI and education tips
    Dashboard,

    /// Show or edit the profile
    Profile {
        /// type1, type2, gestational, prediabetes, or "none" to clear
        #[arg(long)]
        diabetes_type: Option<String>,
        /// Height in cm ("" clears)
        #[arg(long)]
        height: Option<String>,
        /// Weight in kg ("" clears)
        #[arg(long)]
        weight: Option<String>,
    },

    /// Glucose readings
    Readings {
        #[command(subcommand)]
        action: ReadingsAction,
    },

    /// Medications
    Meds {
        #[command(subcommand)]
        action: MedsAction,
    },

    /// Meals and their links to readings
    Meals {
        #[command(subcommand)]
        action: MealsAction,
    },

    /// Onboarding checklist
    Checklist {
        #[command(subcommand)]
        action: Option<ChecklistAction>,
    },

    /// Classify a glucose value without saving it
    Classify {
        /// mg/dL
        value: f64,
        /// pre_meal or post_meal
        #[arg(short, long)]
        context: Option<MealContext>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ReadingsAction {
    List,
    Add {
        /// mg/dL
        value: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// HH:MM (default: now)
        #[arg(long)]
        time: Option<String>,
        /// pre_meal or post_meal
        #[arg(short, long, default_value = "")]
        context: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Show one reading with the server's evaluation
    Show { id: i64 },
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum MedsAction {
    List,
    Add {
        name: String,
        dose: String,
        /// HH:MM
        time: String,
        /// pending, taken or missed
        #[arg(long, default_value = "")]
        status: String,
    },
    /// Set the intake status
    Mark { id: i64, status: MedicationStatus },
}

#[derive(Subcommand)]
pub enum MealsAction {
    List,
    Add {
        name: String,
        /// breakfast, lunch, dinner or snack
        #[arg(long, default_value = "")]
        meal_type: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Attach a meal to a reading
    Link {
        reading_id: i64,
        meal_id: i64,
        #[arg(long)]
        carbs: Option<f64>,
    },
    /// Detach a meal from a reading
    Unlink { reading_id: i64, meal_id: i64 },
}

#[derive(Subcommand)]
pub enum ChecklistAction {
    Show,
    Toggle { id: String },
    Reset,
}

impl Commands {
    /// The screen a command opens; `None` for commands that work logged out
    fn route(&self) -> Option<Route> {
        match self {
            Commands::Login { .. } => Some(Route::Login),
            Commands::Signup { .. } => Some(Route::Signup),
            Commands::Dashboard => Some(Route::Dashboard),
            Commands::Profile { .. } => Some(Route::Profile),
            Commands::Readings { .. } | Commands::Meals { .. } => Some(Route::Readings),
            Commands::Meds { .. } => Some(Route::Medications),
            Commands::Logout
            | Commands::Checklist { .. }
            | Commands::Classify { .. }
            | Commands::Config { .. } => None,
        }
    }
}

/// Everything a screen needs
struct App {
    storage: Arc<dyn ClientStorage>,
    api: Arc<dyn HealthApi>,
    session: Arc<SessionStore>,
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let json = match cli.format.as_str() {
        "table" => false,
        "json" => true,
        other => return Err(anyhow!("Unknown output format: {} (use table or json)", other)),
    };

    // Commands that never touch the session
    match &cli.command {
        Commands::Config { output } => return write_config(output.as_ref()),
        Commands::Classify { value, context } => {
            let c = classify(*value, context.unwrap_or_default());
            if json {
                return print_json(&c);
            }
            println!("{} mg/dL: {} ({})", value, c.status, c.color);
            return Ok(());
        }
        _ => {}
    }

    let mut config = Config::load_default();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }
    init_logging(&config);

    let app = App::open(&config, json)?;
    app.session.restore().await;

    if let Some(route) = cli.command.route() {
        if resolve(route.path(), app.session.is_authed()) != route {
            return Err(anyhow!(
                "Please log in first: diabetrack login --email <EMAIL> --password <PASSWORD>"
            ));
        }
    }

    match cli.command {
        Commands::Login { email, password } => app.login(email, password).await,
        Commands::Signup {
            name,
            email,
            password,
            diabetes_type,
        } => {
            app.signup(SignupForm {
                name,
                email,
                password,
                diabetes_type: diabetes_type.unwrap_or_default(),
            })
            .await
        }
        Commands::Logout => {
            app.session.logout()?;
            println!("Logged out. Local data erased.");
            Ok(())
        }
        Commands::Dashboard => app.dashboard().await,
        Commands::Profile {
            diabetes_type,
            height,
            weight,
        } => app.profile(diabetes_type, height, weight).await,
        Commands::Readings { action } => app.readings(action).await,
        Commands::Meds { action } => app.medications(action).await,
        Commands::Meals { action } => app.meals(action).await,
        Commands::Checklist { action } => app.checklist(action.unwrap_or(ChecklistAction::Show)),
        Commands::Classify { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("diabetrack={}", config.logging.level)));

    let (json_layer, pretty_layer) = if config.logging.format == "json" {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();
}

fn write_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turn a failed view call into the message the screen would show
fn failed(err: ViewError, status: Option<&String>) -> anyhow::Error {
    if let ViewError::Validation(fields) = &err {
        for (field, message) in fields.iter() {
            eprintln!("  {}: {}", field, message);
        }
        return anyhow!("Invalid input");
    }
    match status {
        Some(message) => anyhow!("{}", message),
        None => anyhow!(err),
    }
}

impl App {
    fn open(config: &Config, json: bool) -> anyhow::Result<Self> {
        let path = config.session_file();
        let storage: Arc<dyn ClientStorage> = Arc::new(
            FileStorage::open(&path)
                .with_context(|| format!("Failed to open session file {:?}", path))?,
        );
        let api: Arc<dyn HealthApi> = Arc::new(ApiClient::new(config.api_client_config())?);
        let session = Arc::new(SessionStore::new(Arc::clone(&storage), Arc::clone(&api)));

        tracing::debug!(path = ?path, api = %config.api.base_url, "Client ready");

        Ok(Self {
            storage,
            api,
            session,
            json,
        })
    }

    fn session(&self) -> Arc<dyn Session> {
        self.session.clone()
    }

    async fn login(&self, email: String, password: String) -> anyhow::Result<()> {
        let mut view = LoginView::new(self.session());
        view.form.email = email;
        view.form.password = password;

        let next = view
            .submit()
            .await
            .map_err(|e| failed(e, view.status.as_ref()))?;
        println!("Logged in. Next: {}", next);
        Ok(())
    }

    async fn signup(&self, form: SignupForm) -> anyhow::Result<()> {
        let mut view = SignupView::new(self.session());
        view.form = form;

        let next = view
            .submit()
            .await
            .map_err(|e| failed(e, view.status.as_ref()))?;
        println!("Account created. Next: {}", next);
        Ok(())
    }

    async fn dashboard(&self) -> anyhow::Result<()> {
        let mut view = DashboardView::new(self.session(), Arc::clone(&self.api));
        let bmi = view.load().await.map_err(|e| failed(e, None))?.clone();
        let (name, email) = view
            .profile()
            .map(|p| (p.name, p.email))
            .unwrap_or_default();
        let tips = view.tips();
        let checklist = ChecklistTracker::load(Arc::clone(&self.storage));

        if self.json {
            #[derive(Serialize)]
            struct Dashboard<'a> {
                name: &'a str,
                email: &'a str,
                diabetes_type: &'a str,
                bmi: Option<f64>,
                bmi_category: Option<String>,
                tips: &'a [String],
                checklist_completed: usize,
                checklist_total: usize,
            }
            let (value, category) = match &bmi {
                BmiState::Ready(report) => (Some(report.bmi), Some(report.category.to_string())),
                _ => (None, None),
            };
            return print_json(&Dashboard {
                name: &name,
                email: &email,
                diabetes_type: view.diabetes_type_label(),
                bmi: value,
                bmi_category: category,
                tips: &tips,
                checklist_completed: checklist.completed(),
                checklist_total: checklist.total(),
            });
        }

        println!("Welcome, {}", name);
        println!("  Email:         {}", email);
        println!("  Diabetes type: {}", view.diabetes_type_label());
        match &bmi {
            BmiState::NeedsProfile => {
                println!("  BMI:           set height and weight on your profile")
            }
            BmiState::Ready(report) => {
                println!("  BMI:           {:.1} ({})", report.bmi, report.category)
            }
            BmiState::Failed(message) => println!("  BMI:           {}", message),
        }

        println!();
        println!("Education tips:");
        if tips.is_empty() {
            println!("  {}", NO_TIPS);
        }
        for tip in &tips {
            println!("  - {}", tip);
        }

        println!();
        println!(
            "Checklist: {}/{} completed",
            checklist.completed(),
            checklist.total()
        );

        let links: Vec<&str> = nav_links(self.session.is_authed())
            .iter()
            .map(|l| l.label())
            .collect();
        println!("{}", links.join(" | "));
        Ok(())
    }

    async fn profile(
        &self,
        diabetes_type: Option<String>,
        height: Option<String>,
        weight: Option<String>,
    ) -> anyhow::Result<()> {
        let mut view = ProfileView::new(self.session());
        let editing = diabetes_type.is_some() || height.is_some() || weight.is_some();

        if let Some(t) = diabetes_type {
            view.form.diabetes_type = if t == "none" { String::new() } else { t };
        }
        if let Some(h) = height {
            view.form.height_cm = h;
        }
        if let Some(w) = weight {
            view.form.weight_kg = w;
        }

        if editing {
            view.submit()
                .await
                .map_err(|e| failed(e, view.status.as_ref()))?;
            if let Some(status) = &view.status {
                println!("{}", status);
            }
        }

        let Some(profile) = self.session.profile() else {
            return Ok(());
        };
        if self.json {
            return print_json(&profile);
        }
        println!("Name:          {}", profile.name);
        println!("Email:         {}", profile.email);
        println!("Diabetes type: {}", profile.diabetes_type_label());
        println!(
            "Height:        {}",
            profile.height_cm.map(|h| format!("{} cm", h)).unwrap_or_else(|| "-".into())
        );
        println!(
            "Weight:        {}",
            profile.weight_kg.map(|w| format!("{} kg", w)).unwrap_or_else(|| "-".into())
        );
        Ok(())
    }

    async fn readings(&self, action: ReadingsAction) -> anyhow::Result<()> {
        let mut view = ReadingsView::new(self.session(), Arc::clone(&self.api));

        match action {
            ReadingsAction::List => {
                view.load().await.map_err(|e| failed(e, view.error.as_ref()))?;
                let rows = view.classified();
                if self.json {
                    #[derive(Serialize)]
                    struct Row<'a> {
                        #[serde(flatten)]
                        reading: &'a diabetrack::models::Reading,
                        classification: diabetrack::Classification,
                    }
                    let rows: Vec<Row> = rows
                        .into_iter()
                        .map(|(reading, classification)| Row {
                            reading,
                            classification,
                        })
                        .collect();
                    return print_json(&rows);
                }
                if rows.is_empty() {
                    println!("No readings yet. Add one with: diabetrack readings add <value>");
                    return Ok(());
                }
                println!(
                    "{:<6} {:<11} {:<6} {:>7} {:<10} {}",
                    "ID", "Date", "Time", "mg/dL", "Context", "Status"
                );
                println!("{}", "-".repeat(52));
                for (r, c) in rows {
                    println!(
                        "{:<6} {:<11} {:<6} {:>7.0} {:<10} {}",
                        r.id,
                        r.date,
                        r.time.format("%H:%M"),
                        r.value,
                        r.context.label(),
                        c.status
                    );
                }
            }
            ReadingsAction::Add {
                value,
                date,
                time,
                context,
                notes,
            } => {
                let now = Local::now();
                let form = ReadingForm {
                    value,
                    date: date.unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
                    time: time.unwrap_or_else(|| now.format("%H:%M").to_string()),
                    context,
                    notes,
                };
                let reading = view
                    .create(&form)
                    .await
                    .map_err(|e| failed(e, view.status.as_ref()))?;
                if self.json {
                    return print_json(&reading);
                }
                let c = classify(reading.value, reading.context);
                println!(
                    "Reading {} saved: {} mg/dL ({}, {})",
                    reading.id, reading.value, c.status, c.color
                );
            }
            ReadingsAction::Show { id } => {
                let reading = view
                    .show(id)
                    .await
                    .map_err(|e| failed(e, view.error.as_ref()))?;
                if self.json {
                    return print_json(&reading);
                }
                let c = classify(reading.value, reading.context);
                println!("Reading {}", reading.id);
                println!("  Value:   {} mg/dL", reading.value);
                println!("  When:    {} {}", reading.date, reading.time.format("%H:%M"));
                println!("  Context: {}", reading.context.label());
                println!("  Status:  {} ({})", c.status, c.color);
                if let Some(notes) = &reading.notes {
                    println!("  Notes:   {}", notes);
                }
                if let Some(evaluation) = &reading.evaluation {
                    println!("  Server evaluation: {}", evaluation.status);
                    for suggestion in &evaluation.suggestions {
                        println!("    - {}", suggestion);
                    }
                }
            }
            ReadingsAction::Delete { id, yes } => {
                if !yes {
                    println!("Delete reading {}? Re-run with --yes to confirm.", id);
                    return Ok(());
                }
                view.delete(id, true)
                    .await
                    .map_err(|e| failed(e, view.status.as_ref()))?;
                println!("Reading {} deleted", id);
            }
        }
        Ok(())
    }

    async fn medications(&self, action: MedsAction) -> anyhow::Result<()> {
        let mut view = MedicationsView::new(self.session(), Arc::clone(&self.api));

        match action {
            MedsAction::List => {
                view.load().await.map_err(|e| failed(e, view.error.as_ref()))?;
                if self.json {
                    return print_json(view.medications());
                }
                if view.medications().is_empty() {
                    println!("No medications yet.");
                    return Ok(());
                }
                println!("{:<6} {:<20} {:<10} {:<6} {}", "ID", "Name", "Dose", "Time", "Status");
                println!("{}", "-".repeat(54));
                for m in view.medications() {
                    println!(
                        "{:<6} {:<20} {:<10} {:<6} {}",
                        m.id,
                        m.name,
                        m.dose,
                        m.time.format("%H:%M"),
                        m.status
                    );
                }
            }
            MedsAction::Add {
                name,
                dose,
                time,
                status,
            } => {
                let form = MedicationForm {
                    name,
                    dose,
                    time,
                    status,
                };
                let medication = view
                    .create(&form)
                    .await
                    .map_err(|e| failed(e, view.status.as_ref()))?;
                if self.json {
                    return print_json(&medication);
                }
                println!("Medication {} added: {}", medication.id, medication.name);
            }
            MedsAction::Mark { id, status } => {
                let medication = view
                    .update_status(id, status)
                    .await
                    .map_err(|e| failed(e, view.status.as_ref()))?;
                if self.json {
                    return print_json(&medication);
                }
                println!("{} marked {}", medication.name, medication.status);
            }
        }
        Ok(())
    }

    async fn meals(&self, action: MealsAction) -> anyhow::Result<()> {
        let mut view = MealsView::new(self.session(), Arc::clone(&self.api));

        match action {
            MealsAction::List => {
                view.load().await.map_err(|e| failed(e, view.error.as_ref()))?;
                if self.json {
                    return print_json(view.meals());
                }
                if view.meals().is_empty() {
                    println!("No meals yet.");
                    return Ok(());
                }
                println!("{:<6} {:<24} {:<10} {}", "ID", "Name", "Type", "Description");
                println!("{}", "-".repeat(60));
                for meal in view.meals() {
                    println!(
                        "{:<6} {:<24} {:<10} {}",
                        meal.id,
                        meal.name,
                        meal.meal_type.as_deref().unwrap_or("-"),
                        meal.description.as_deref().unwrap_or("")
                    );
                }
            }
            MealsAction::Add {
                name,
                meal_type,
                description,
            } => {
                let form = MealForm {
                    name,
                    meal_type,
                    description,
                };
                let meal = view
                    .create(&form)
                    .await
                    .map_err(|e| failed(e, view.status.as_ref()))?;
                if self.json {
                    return print_json(&meal);
                }
                println!("Meal {} added: {}", meal.id, meal.name);
            }
            MealsAction::Link {
                reading_id,
                meal_id,
                carbs,
            } => {
                let link = view
                    .link(reading_id, meal_id, carbs)
                    .await
                    .map_err(|e| failed(e, view.status.as_ref()))?;
                if self.json {
                    return print_json(&link);
                }
                println!("Meal {} linked to reading {}", link.meal_id, link.reading_id);
            }
            MealsAction::Unlink {
                reading_id,
                meal_id,
            } => {
                view.unlink(reading_id, meal_id)
                    .await
                    .map_err(|e| failed(e, view.status.as_ref()))?;
                println!("Meal {} unlinked from reading {}", meal_id, reading_id);
            }
        }
        Ok(())
    }

    fn checklist(&self, action: ChecklistAction) -> anyhow::Result<()> {
        let mut checklist = ChecklistTracker::load(Arc::clone(&self.storage));

        match action {
            ChecklistAction::Show => {}
            ChecklistAction::Toggle { id } => {
                if !checklist.toggle(&id)? {
                    return Err(anyhow!("Unknown checklist task: {}", id));
                }
            }
            ChecklistAction::Reset => checklist.reset()?,
        }

        if self.json {
            return print_json(checklist.tasks());
        }
        for task in checklist.tasks() {
            println!(
                "[{}] {:<11} {}{}",
                if task.done { "x" } else { " " },
                task.id,
                task.label,
                if task.required { " (required)" } else { "" }
            );
        }
        println!("{}/{} completed", checklist.completed(), checklist.total());
        Ok(())
    }
}
