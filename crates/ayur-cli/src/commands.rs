//! Subcommands and their handlers

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use tracing::info;

use ayur_auth::{extract_bearer_token, PortalArea, Session};
use ayur_core::types::DateRange;
use ayur_models::{
    AppointmentStatus, Audience, CancelAppointment, ContentStatus, ContentType, NewContent,
    NewNotification, NewUser, NotificationType, Review, Role, Severity, TransactionStatus,
    TransactionType, VerificationStatus,
};
use ayur_queries::{ActiveState, Choice, Filterable, ReadState, RecordFilter};
use ayur_services::{ListManager, Portal, ServiceResult};

use crate::output::{print_json, print_page};

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with a token issued by the backend
    Login {
        /// Raw JWT or a full `Bearer <token>` header value
        #[arg(long)]
        token: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Admin dashboard counters
    Dashboard,
    Users(UsersArgs),
    Practitioners(PractitionersArgs),
    Patients(PatientsArgs),
    Appointments(AppointmentsArgs),
    /// The signed-in patient's own appointments
    MyAppointments(MyAppointmentsArgs),
    Notifications(NotificationsArgs),
    AuditLogs(AuditLogsArgs),
    Content(ContentArgs),
    Revenue(RevenueArgs),
}

/// Options shared by every list screen
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page to show (1-indexed)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Free-text search
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DateRangeArgs {
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl From<DateRangeArgs> for DateRange {
    fn from(args: DateRangeArgs) -> Self {
        DateRange {
            from: args.from,
            to: args.to,
        }
    }
}

/// Actions on a single listed record
#[derive(Subcommand, Debug, Clone)]
pub enum RecordAction {
    /// Show the record in full
    View { id: String },
    /// Flip the active flag
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Args)]
pub struct UsersArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long, default_value = "all")]
    role: Choice<Role>,
    #[arg(long, default_value = "all")]
    status: Choice<ActiveState>,
    #[command(subcommand)]
    action: Option<UserAction>,
}

#[derive(Subcommand)]
enum UserAction {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        password: Option<String>,
    },
    #[command(flatten)]
    Record(RecordAction),
}

#[derive(Args)]
pub struct PractitionersArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long, default_value = "all")]
    verification: Choice<VerificationStatus>,
    #[arg(long, default_value = "all")]
    specialization: Choice<String>,
    #[command(subcommand)]
    action: Option<PractitionerAction>,
}

#[derive(Subcommand)]
enum PractitionerAction {
    Approve {
        id: String,
    },
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Ask for more information before deciding
    RequestReview {
        id: String,
        #[arg(long)]
        notes: String,
    },
    #[command(flatten)]
    Record(RecordAction),
}

#[derive(Args)]
pub struct PatientsArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long, default_value = "all")]
    status: Choice<ActiveState>,
    #[command(subcommand)]
    action: Option<RecordAction>,
}

#[derive(Args)]
pub struct AppointmentsArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long, default_value = "all")]
    status: Choice<AppointmentStatus>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    practitioner: Option<String>,
    #[command(subcommand)]
    action: Option<AppointmentAction>,
}

#[derive(Subcommand)]
enum AppointmentAction {
    View { id: String },
    Confirm { id: String },
    Start { id: String },
    Complete { id: String },
    Cancel {
        id: String,
        #[arg(long)]
        reason: String,
    },
    NoShow { id: String },
}

#[derive(Args)]
pub struct MyAppointmentsArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long, default_value = "all")]
    status: Choice<AppointmentStatus>,
    #[command(subcommand)]
    action: Option<MyAppointmentAction>,
}

#[derive(Subcommand)]
enum MyAppointmentAction {
    Cancel {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    Review {
        id: String,
        /// 1 to 5
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Args)]
pub struct NotificationsArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long = "type", default_value = "all")]
    notification_type: Choice<NotificationType>,
    #[arg(long, default_value = "all")]
    read: Choice<ReadState>,
    #[command(subcommand)]
    action: Option<NotificationAction>,
}

#[derive(Subcommand)]
enum NotificationAction {
    Send {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long = "type", default_value = "system")]
        notification_type: NotificationType,
        #[arg(long, default_value = "all")]
        audience: Audience,
    },
    Read {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args)]
pub struct AuditLogsArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long, default_value = "all")]
    action: Choice<String>,
    #[arg(long, default_value = "all")]
    severity: Choice<Severity>,
    #[command(flatten)]
    range: DateRangeArgs,
    /// Save every matching entry as CSV instead of listing
    #[arg(long)]
    export: bool,
}

#[derive(Args)]
pub struct ContentArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long = "type", default_value = "all")]
    content_type: Choice<ContentType>,
    #[arg(long, default_value = "all")]
    status: Choice<ContentStatus>,
    #[command(subcommand)]
    action: Option<ContentAction>,
}

#[derive(Subcommand)]
enum ContentAction {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long = "type")]
        content_type: ContentType,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long)]
        publish: bool,
    },
    View {
        id: String,
    },
    Publish {
        id: String,
    },
    Archive {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args)]
pub struct RevenueArgs {
    #[command(flatten)]
    list: ListArgs,
    #[arg(long, default_value = "all")]
    status: Choice<TransactionStatus>,
    #[arg(long = "type", default_value = "all")]
    transaction_type: Choice<TransactionType>,
    #[command(flatten)]
    range: DateRangeArgs,
    /// Save every matching transaction as CSV instead of listing
    #[arg(long)]
    export: bool,
}

// ---------------------------------------------------------------------------
// Handlers

pub async fn run(command: Command, portal: &Portal) -> anyhow::Result<()> {
    match command {
        Command::Login { token } => login(portal, &token),
        Command::Logout => {
            portal.session().clear()?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => whoami(portal),
        Command::Dashboard => dashboard(portal).await,
        Command::Users(args) => users(portal, args).await,
        Command::Practitioners(args) => practitioners(portal, args).await,
        Command::Patients(args) => patients(portal, args).await,
        Command::Appointments(args) => appointments(portal, args).await,
        Command::MyAppointments(args) => my_appointments(portal, args).await,
        Command::Notifications(args) => notifications(portal, args).await,
        Command::AuditLogs(args) => audit_logs(portal, args).await,
        Command::Content(args) => content(portal, args).await,
        Command::Revenue(args) => revenue(portal, args).await,
    }
}

fn login(portal: &Portal, token: &str) -> anyhow::Result<()> {
    let token = extract_bearer_token(token).unwrap_or(token.trim());
    let session = Session::from_token(token).context("token rejected")?;
    let user = session.user.clone();
    portal.session().establish(session)?;
    info!(user = %user.id, "signed in");
    println!(
        "Signed in as {} <{}> ({} area)",
        user.name,
        user.email,
        PortalArea::home_for(user.role)
    );
    Ok(())
}

fn whoami(portal: &Portal) -> anyhow::Result<()> {
    match portal.session().current() {
        Some(session) => {
            let user = &session.user;
            println!("{} <{}> role={} id={}", user.name, user.email, user.role, user.id);
            if let Some(at) = session.expires_at {
                println!("session expires {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

async fn dashboard(portal: &Portal) -> anyhow::Result<()> {
    let dashboard = portal.dashboard()?;
    let stats = dashboard
        .load()
        .await
        .ok_or_else(|| anyhow!("dashboard unavailable"))?;
    println!("Users                  {}", stats.total_users);
    println!("Practitioners          {}", stats.total_practitioners);
    println!("Pending verifications  {}", stats.pending_verifications);
    println!("Patients               {}", stats.total_patients);
    println!("Appointments today     {}", stats.appointments_today);
    println!("Upcoming appointments  {}", stats.upcoming_appointments);
    println!("Revenue this month     {:.2}", stats.monthly_revenue);
    println!("Unread notifications   {}", stats.unread_notifications);
    Ok(())
}

/// Apply the filter and page
async fn load<R: Filterable>(list: &ListManager<R>, args: &ListArgs, mut filter: R::Filter) {
    if let Some(search) = &args.search {
        filter.set_search(search.clone());
    }
    list.set_filter(filter).await;
    if args.page > 1 {
        list.set_page(args.page).await;
    }
}

fn finish(result: ServiceResult<()>) -> anyhow::Result<()> {
    if result.is_success() {
        Ok(())
    } else {
        bail!(result.full_messages().join("; "))
    }
}

async fn view<R: Filterable + serde::Serialize>(
    list: &ListManager<R>,
    id: &str,
) -> anyhow::Result<()> {
    let record = list
        .select(id)
        .await
        .ok_or_else(|| anyhow!("{} {id} not found", R::TYPE_NAME))?;
    print_json(&record)
}

async fn users(portal: &Portal, args: UsersArgs) -> anyhow::Result<()> {
    let screen = portal.users()?;
    let filter = ayur_queries::UserFilter {
        role: args.role,
        status: args.status,
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    match args.action {
        None => {
            print_page(screen.list());
            Ok(())
        }
        Some(UserAction::Create {
            name,
            email,
            phone,
            role,
            password,
        }) => finish(
            screen
                .create(&NewUser {
                    name,
                    email,
                    phone,
                    role,
                    password,
                })
                .await,
        ),
        Some(UserAction::Record(RecordAction::View { id })) => view(screen.list(), &id).await,
        Some(UserAction::Record(RecordAction::Toggle { id })) => {
            finish(screen.toggle_active(&id).await)
        }
        Some(UserAction::Record(RecordAction::Delete { id })) => finish(screen.delete(&id).await),
    }
}

async fn practitioners(portal: &Portal, args: PractitionersArgs) -> anyhow::Result<()> {
    let screen = portal.practitioners()?;
    let filter = ayur_queries::PractitionerFilter {
        verification_status: args.verification,
        specialization: args.specialization,
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    match args.action {
        None => {
            print_page(screen.list());
            Ok(())
        }
        Some(PractitionerAction::Approve { id }) => finish(screen.approve(&id).await),
        Some(PractitionerAction::Reject { id, reason }) => {
            finish(screen.reject(&id, reason).await)
        }
        Some(PractitionerAction::RequestReview { id, notes }) => finish(
            screen
                .review_verification(&id, &ayur_models::VerificationDecision::request_review(notes))
                .await,
        ),
        Some(PractitionerAction::Record(RecordAction::View { id })) => {
            let record = screen
                .view(&id)
                .await
                .ok_or_else(|| anyhow!("Practitioner {id} not found"))?;
            print_json(&record)
        }
        Some(PractitionerAction::Record(RecordAction::Toggle { id })) => {
            finish(screen.toggle_active(&id).await)
        }
        Some(PractitionerAction::Record(RecordAction::Delete { id })) => {
            finish(screen.delete(&id).await)
        }
    }
}

async fn patients(portal: &Portal, args: PatientsArgs) -> anyhow::Result<()> {
    let screen = portal.patients()?;
    let filter = ayur_queries::PatientFilter {
        status: args.status,
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    match args.action {
        None => {
            print_page(screen.list());
            Ok(())
        }
        Some(RecordAction::View { id }) => {
            let record = screen
                .view(&id)
                .await
                .ok_or_else(|| anyhow!("Patient {id} not found"))?;
            print_json(&record)
        }
        Some(RecordAction::Toggle { id }) => finish(screen.toggle_active(&id).await),
        Some(RecordAction::Delete { id }) => finish(screen.delete(&id).await),
    }
}

async fn appointments(portal: &Portal, args: AppointmentsArgs) -> anyhow::Result<()> {
    let screen = portal.appointments()?;
    let filter = ayur_queries::AppointmentFilter {
        status: args.status,
        date: args.date,
        practitioner_id: args.practitioner,
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    match args.action {
        None => {
            print_page(screen.list());
            Ok(())
        }
        Some(AppointmentAction::View { id }) => view(screen.list(), &id).await,
        Some(AppointmentAction::Confirm { id }) => finish(screen.confirm(&id).await),
        Some(AppointmentAction::Start { id }) => finish(screen.start(&id).await),
        Some(AppointmentAction::Complete { id }) => finish(screen.complete(&id).await),
        Some(AppointmentAction::Cancel { id, reason }) => {
            finish(screen.cancel(&id, reason).await)
        }
        Some(AppointmentAction::NoShow { id }) => finish(screen.mark_no_show(&id).await),
    }
}

async fn my_appointments(portal: &Portal, args: MyAppointmentsArgs) -> anyhow::Result<()> {
    let screen = portal.my_appointments()?;
    let filter = ayur_queries::AppointmentFilter {
        status: args.status,
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    match args.action {
        None => {
            print_page(screen.list());
            Ok(())
        }
        Some(MyAppointmentAction::Cancel { id, reason }) => {
            finish(screen.cancel(&id, &CancelAppointment { reason }).await)
        }
        Some(MyAppointmentAction::Review {
            id,
            rating,
            comment,
        }) => finish(screen.review(&id, &Review { rating, comment }).await),
    }
}

async fn notifications(portal: &Portal, args: NotificationsArgs) -> anyhow::Result<()> {
    let screen = portal.notifications()?;
    let filter = ayur_queries::NotificationFilter {
        notification_type: args.notification_type,
        read: args.read,
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    match args.action {
        None => {
            print_page(screen.list());
            println!("{} unread on this page", screen.unread_on_page());
            Ok(())
        }
        Some(NotificationAction::Send {
            title,
            message,
            notification_type,
            audience,
        }) => finish(
            screen
                .send(&NewNotification {
                    title,
                    message,
                    notification_type,
                    audience,
                })
                .await,
        ),
        Some(NotificationAction::Read { id }) => finish(screen.mark_read(&id).await),
        Some(NotificationAction::Delete { id }) => finish(screen.delete(&id).await),
    }
}

async fn audit_logs(portal: &Portal, args: AuditLogsArgs) -> anyhow::Result<()> {
    let screen = portal.audit_logs()?;
    let filter = ayur_queries::AuditLogFilter {
        action: args.action,
        severity: args.severity,
        date_range: args.range.into(),
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    if args.export {
        let directory = portal.config().export.directory.clone();
        let result = screen.export(&directory, Local::now().date_naive()).await;
        if let Some(path) = result.result() {
            println!("{}", path.display());
        }
        return finish(result.map(|_| ()));
    }

    print_page(screen.list());
    Ok(())
}

async fn content(portal: &Portal, args: ContentArgs) -> anyhow::Result<()> {
    let screen = portal.content()?;
    let filter = ayur_queries::ContentFilter {
        content_type: args.content_type,
        status: args.status,
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    match args.action {
        None => {
            print_page(screen.list());
            Ok(())
        }
        Some(ContentAction::Create {
            title,
            body,
            content_type,
            tags,
            publish,
        }) => {
            let status = if publish {
                ContentStatus::Published
            } else {
                ContentStatus::Draft
            };
            finish(
                screen
                    .create(&NewContent {
                        title,
                        body,
                        content_type,
                        tags,
                        status,
                    })
                    .await,
            )
        }
        Some(ContentAction::View { id }) => view(screen.list(), &id).await,
        Some(ContentAction::Publish { id }) => finish(screen.publish(&id).await),
        Some(ContentAction::Archive { id }) => finish(screen.archive(&id).await),
        Some(ContentAction::Delete { id }) => finish(screen.delete(&id).await),
    }
}

async fn revenue(portal: &Portal, args: RevenueArgs) -> anyhow::Result<()> {
    let screen = portal.revenue()?;
    let filter = ayur_queries::TransactionFilter {
        status: args.status,
        transaction_type: args.transaction_type,
        date_range: args.range.into(),
        ..Default::default()
    };
    load(screen.list(), &args.list, filter).await;

    if args.export {
        let directory = portal.config().export.directory.clone();
        let result = screen.export(&directory, Local::now().date_naive()).await;
        if let Some(path) = result.result() {
            println!("{}", path.display());
        }
        return finish(result.map(|_| ()));
    }

    let summary = match screen.load_summary().await {
        Some(summary) => summary,
        None => screen.page_summary(),
    };
    println!(
        "Revenue {:.2}  pending {:.2}  refunded {:.2}  net {:.2}  ({} transactions)",
        summary.total_revenue,
        summary.pending_amount,
        summary.refunded_amount,
        summary.net_revenue(),
        summary.transaction_count
    );
    print_page(screen.list());
    Ok(())
}
