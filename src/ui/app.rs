//! Main application state, async actions and the frame loop.

use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, Utc};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::analytics::BestSellerWindow;
use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::finance::{FinanceReport, TimeRange};
use crate::forms::{CouponForm, EmployeeForm, LoginForm, PasswordForm, ProductForm, RoleForm, SignupForm};
use crate::kassa::{KassaSession, LookupOutcome};
use crate::models::permission::{self, URLAUB_READ};
use crate::models::{
    AccessRights, BestSellingProduct, Coupon, Employee, PriceHistory, Product, Role, Stock, VacationRequest,
};
use crate::vacation::{RequestFilter, ReviewDecision, VacationForm};

use super::components::colors;
use super::{
    coupon_panel, dashboard, employee_panel, finance_panel, kassa_panel, login_panel, product_panel, role_panel,
    settings_panel, vacation_panel,
};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Login,
    Dashboard,
    Kassa,
    Products,
    Employees,
    Roles,
    Coupons,
    Finance,
    Vacation,
    Settings,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Login => "Anmeldung",
            Panel::Dashboard => "Menü",
            Panel::Kassa => "Kasse",
            Panel::Products => "Produkte",
            Panel::Employees => "Mitarbeiter",
            Panel::Roles => "Rollen",
            Panel::Coupons => "Coupons",
            Panel::Finance => "Finanzen",
            Panel::Vacation => "Urlaub",
            Panel::Settings => "Einstellungen",
        }
    }

    /// Permission needed to open the panel; `None` for panels every
    /// logged-in employee may use.
    pub fn required_permission(&self) -> Option<&'static str> {
        match self {
            Panel::Kassa => Some(permission::KASSE),
            Panel::Products => Some(permission::PRODUCT_READ),
            Panel::Employees => Some(permission::USER_READ),
            Panel::Roles => Some(permission::ROLE_READ),
            Panel::Coupons => Some(permission::COUPONS_READ),
            Panel::Finance => Some(permission::FINANCES),
            Panel::Login | Panel::Dashboard | Panel::Vacation | Panel::Settings => None,
        }
    }
}

/// Logged-in employee and the rights returned by session validation.
#[derive(Debug, Clone)]
pub struct Session {
    pub employee: Employee,
    pub rights: AccessRights,
}

impl Session {
    pub fn allows(&self, permission: &str) -> bool {
        self.rights.allows(permission)
    }

    pub fn can_open(&self, panel: Panel) -> bool {
        panel != Panel::Login && panel.required_permission().is_none_or(|p| self.allows(p))
    }
}

/// Data to refetch after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reload {
    Employees,
    Roles,
    Products,
    Coupons,
    Vacation,
    Nothing,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Session
    LoggedIn(Session),
    LoginFailed(String),
    LoggedOut,
    SessionExpired,

    // Data loading
    EmployeesLoaded(Vec<Employee>),
    RolesLoaded(Vec<Role>),
    ProductsLoaded(Vec<Product>),
    StocksLoaded(Vec<Stock>),
    CouponsLoaded(Vec<Coupon>),
    VacationLoaded(Vec<VacationRequest>),
    MyVacationLoaded(Vec<VacationRequest>),
    PriceHistoryLoaded(String, Vec<PriceHistory>),
    BestSellerLoaded(Option<BestSellingProduct>),
    FinanceLoaded(FinanceReport),

    // Kassa
    EanLookedUp(LookupOutcome),
    SaleRecorded,
    CheckoutCompleted { total: f64, client_secret: String },
    CheckoutFailed(String),

    // CRUD operations
    Saved { message: String, reload: Reload },
    OperationFailed(String),

    // Connection test
    ServerTestResult(Result<(), String>),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Target for delete confirmation dialog.
#[derive(Clone)]
pub enum DeleteTarget {
    Employee(Employee),
    Role(i32, String),
    Product(String, String),
    Coupon(String),
    VacationRequest(i32),
}

/// Open review dialog of the vacation manager table.
#[derive(Clone)]
pub struct ReviewDialog {
    pub request: VacationRequest,
    pub decision: ReviewDecision,
    pub comment: String,
}

/// Tabs of the vacation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VacationTab {
    #[default]
    Mine,
    Manage,
}

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    pub api: ApiClient,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation and session
    pub current_panel: Panel,
    pub session: Option<Session>,
    pub login_form: LoginForm,
    pub login_error: Option<String>,
    pub is_logging_in: bool,

    // Cached data
    pub employees: Vec<Employee>,
    pub roles: Vec<Role>,
    pub products: Vec<Product>,
    pub stocks: Vec<Stock>,
    pub coupons: Vec<Coupon>,
    pub vacation_requests: Vec<VacationRequest>,
    pub my_vacation_requests: Vec<VacationRequest>,

    // Loading states
    pub is_loading: bool,
    pub loading_message: String,

    // Forms
    pub employee_form: EmployeeForm,
    pub signup_form: SignupForm,
    pub role_form: RoleForm,
    pub product_form: ProductForm,
    pub coupon_form: CouponForm,
    pub password_form: PasswordForm,
    pub vacation_form: VacationForm,
    pub vacation_form_open: bool,
    /// Inline validation message of the open dialog.
    pub form_error: Option<String>,

    // Search/filter state
    pub employee_search: String,
    pub product_search: String,
    pub product_show_inactive: bool,
    pub vacation_filter: RequestFilter,
    pub vacation_tab: VacationTab,
    pub review_dialog: Option<ReviewDialog>,

    // Product analytics
    pub selected_product: Option<String>,
    pub price_history: Vec<PriceHistory>,
    pub best_seller_window: BestSellerWindow,
    pub best_seller: Option<BestSellingProduct>,

    // Finance
    pub finance_range: TimeRange,
    pub finance_custom_start: NaiveDate,
    pub finance_custom_end: NaiveDate,
    pub finance_employee: Option<i32>,
    pub finance_report: Option<FinanceReport>,

    // Kassa
    pub kassa: KassaSession,
    pub last_payment: Option<(f64, String)>,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub settings_draft: AppConfig,
    pub server_test: Option<Result<(), String>>,
    pub server_testing: bool,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(api: ApiClient, config: AppConfig, config_path: PathBuf, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let today = Local::now().date_naive();

        Self {
            rt,
            api,
            tx,
            rx,
            current_panel: Panel::Login,
            session: None,
            login_form: LoginForm::with_last_id(config.session.last_employee_id),
            login_error: None,
            is_logging_in: false,
            employees: Vec::new(),
            roles: Vec::new(),
            products: Vec::new(),
            stocks: Vec::new(),
            coupons: Vec::new(),
            vacation_requests: Vec::new(),
            my_vacation_requests: Vec::new(),
            is_loading: false,
            loading_message: String::new(),
            employee_form: EmployeeForm::default(),
            signup_form: SignupForm::default(),
            role_form: RoleForm::default(),
            product_form: ProductForm::default(),
            coupon_form: CouponForm::default(),
            password_form: PasswordForm::default(),
            vacation_form: VacationForm::default(),
            vacation_form_open: false,
            form_error: None,
            employee_search: String::new(),
            product_search: String::new(),
            product_show_inactive: true,
            vacation_filter: RequestFilter::default(),
            vacation_tab: VacationTab::default(),
            review_dialog: None,
            selected_product: None,
            price_history: Vec::new(),
            best_seller_window: BestSellerWindow::default(),
            best_seller: None,
            finance_range: TimeRange::default(),
            finance_custom_start: today,
            finance_custom_end: today,
            finance_employee: None,
            finance_report: None,
            kassa: KassaSession::new(&config.kassa),
            last_payment: None,
            log_messages: Vec::new(),
            settings_draft: config.clone(),
            config,
            config_path,
            server_test: None,
            server_testing: false,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
        }
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// True when the logged-in employee holds `permission` (or admin).
    pub fn allows(&self, permission: &str) -> bool {
        self.session.as_ref().is_some_and(|s| s.allows(permission))
    }

    pub fn employee_id(&self) -> Option<i32> {
        self.session.as_ref().map(|s| s.employee.employee_id)
    }

    /// Run `task` on the runtime and send its outcome back to the UI.
    ///
    /// An expired session becomes [`UiMessage::SessionExpired`]; any other
    /// error is reported with its user-facing message.
    fn spawn<T, Fut, F>(&self, task: Fut, on_ok: F)
    where
        T: Send + 'static,
        Fut: Future<Output = crate::Result<T>> + Send + 'static,
        F: FnOnce(T) -> UiMessage + Send + 'static,
    {
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let msg = match task.await {
                Ok(value) => on_ok(value),
                Err(e) => failure_message(e),
            };
            let _ = tx.send(msg);
        });
    }

    fn start_loading(&mut self, message: &str) {
        self.is_loading = true;
        self.loading_message = message.to_string();
    }

    // ---------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------

    pub fn login(&mut self) {
        let request = match self.login_form.validate() {
            Ok(r) => r,
            Err(e) => {
                self.login_error = Some(e.user_message());
                return;
            }
        };

        self.login_error = None;
        self.is_logging_in = true;
        let api = self.api.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = async {
                api.login(request.employee_id, &request.password).await?;
                let rights = api.validate_session().await?;
                let employee = api.current_employee().await?;
                Ok::<_, AppError>(Session { employee, rights })
            }
            .await;

            let msg = match result {
                Ok(session) => UiMessage::LoggedIn(session),
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    UiMessage::LoginFailed(e.user_message())
                }
            };
            let _ = tx.send(msg);
        });
    }

    fn on_logged_in(&mut self, session: Session) {
        self.is_logging_in = false;
        self.login_form.password.clear();
        let id = session.employee.employee_id;
        self.log_success(format!("Angemeldet als {}", session.employee.full_name()));
        self.session = Some(session);
        self.current_panel = Panel::Dashboard;
        self.load_vacation();

        if self.config.session.last_employee_id != Some(id) {
            self.config.session.last_employee_id = Some(id);
            self.settings_draft.session.last_employee_id = Some(id);
            if let Err(e) = self.config.save(&self.config_path) {
                tracing::error!("Failed to save config: {}", e);
            }
        }
    }

    pub fn logout(&mut self) {
        let api = self.api.clone();
        self.spawn(async move { api.logout().await }, |_| UiMessage::LoggedOut);
        self.clear_session();
    }

    /// Drop all per-user state and return to the login screen.
    fn clear_session(&mut self) {
        self.session = None;
        self.current_panel = Panel::Login;
        self.employees.clear();
        self.vacation_requests.clear();
        self.my_vacation_requests.clear();
        self.finance_report = None;
        self.kassa = KassaSession::new(&self.config.kassa);
        self.last_payment = None;
        self.review_dialog = None;
        self.vacation_form_open = false;
        self.is_loading = false;
    }

    /// Switch panels, refusing the ones the employee may not open.
    pub fn open_panel(&mut self, panel: Panel) {
        let allowed = self.session.as_ref().is_some_and(|s| s.can_open(panel));
        if !allowed {
            self.error_message = Some("Keine Berechtigung für diesen Bereich".to_string());
            return;
        }

        self.form_error = None;
        self.current_panel = panel;
        match panel {
            Panel::Employees => {
                self.load_employees();
                self.load_roles();
            }
            Panel::Roles => self.load_roles(),
            Panel::Products => {
                self.load_products();
                self.load_best_seller();
            }
            Panel::Coupons => self.load_coupons(),
            Panel::Finance => {
                if self.employees.is_empty() && self.allows(permission::USER_READ) {
                    self.load_employees();
                }
                self.load_finance();
            }
            Panel::Vacation => {
                self.load_vacation();
                if self.allows(URLAUB_READ) && self.employees.is_empty() {
                    self.load_employees();
                }
            }
            Panel::Settings => {
                self.settings_draft = self.config.clone();
                self.server_test = None;
            }
            Panel::Login | Panel::Dashboard | Panel::Kassa => {}
        }
    }

    // ---------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------

    pub fn load_employees(&mut self) {
        self.start_loading("Mitarbeiter werden geladen...");
        let api = self.api.clone();
        self.spawn(async move { api.employees().await }, UiMessage::EmployeesLoaded);
    }

    pub fn load_roles(&mut self) {
        let api = self.api.clone();
        self.spawn(async move { api.roles().await }, UiMessage::RolesLoaded);
    }

    /// Products and their stock records.
    pub fn load_products(&mut self) {
        self.start_loading("Produkte werden geladen...");
        let api = self.api.clone();
        self.spawn(async move { api.products().await }, UiMessage::ProductsLoaded);
        let api = self.api.clone();
        self.spawn(async move { api.stocks().await }, UiMessage::StocksLoaded);
    }

    pub fn load_coupons(&mut self) {
        self.start_loading("Coupons werden geladen...");
        let api = self.api.clone();
        self.spawn(async move { api.coupons().await }, UiMessage::CouponsLoaded);
    }

    /// Own requests, plus all requests for employees allowed to manage them.
    pub fn load_vacation(&mut self) {
        let api = self.api.clone();
        self.spawn(async move { api.my_vacation_requests().await }, UiMessage::MyVacationLoaded);

        if self.allows(URLAUB_READ) {
            let api = self.api.clone();
            self.spawn(async move { api.vacation_requests().await }, UiMessage::VacationLoaded);
        }
    }

    pub fn select_product(&mut self, product_id: &str) {
        self.selected_product = Some(product_id.to_string());
        self.price_history.clear();

        let api = self.api.clone();
        let id = product_id.to_string();
        self.spawn(
            async move {
                let history = api.price_history(&id).await?;
                Ok((id, history))
            },
            |(id, history)| UiMessage::PriceHistoryLoaded(id, history),
        );
    }

    pub fn load_best_seller(&mut self) {
        let (start, end) = self.best_seller_window.bounds(Local::now());
        let api = self.api.clone();
        self.spawn(async move { api.best_selling(start, end).await }, UiMessage::BestSellerLoaded);
    }

    /// Orders of the selected period and the one before it.
    pub fn load_finance(&mut self) {
        let today = Local::now().date_naive();
        let range = match self.finance_range {
            TimeRange::Custom { .. } => TimeRange::Custom {
                start: self.finance_custom_start,
                end: self.finance_custom_end,
            },
            other => other,
        };
        let period = match range.period(today) {
            Ok(p) => p,
            Err(e) => {
                self.form_error = Some(e.user_message());
                return;
            }
        };
        self.form_error = None;
        self.finance_range = range;
        self.start_loading("Umsätze werden geladen...");

        let previous = period.previous();
        let employee = self.finance_employee;
        let api = self.api.clone();
        self.spawn(
            async move {
                let (orders, previous_orders) = tokio::try_join!(
                    api.orders_between(period.start_instant(), period.end_instant(), employee),
                    api.orders_between(previous.start_instant(), previous.end_instant(), employee),
                )?;
                Ok(FinanceReport::new(range, period, orders, &previous_orders))
            },
            UiMessage::FinanceLoaded,
        );
    }

    // ---------------------------------------------------------------
    // Employees and roles
    // ---------------------------------------------------------------

    pub fn save_employee(&mut self) {
        let employee = match self.employee_form.validate(&self.roles) {
            Ok(e) => e,
            Err(e) => {
                self.form_error = Some(e.user_message());
                return;
            }
        };

        let api = self.api.clone();
        self.spawn(
            async move {
                api.update_employee(&employee)
                    .await
                    .map_err(|e| reword(e, "Fehler beim Aktualisieren des Mitarbeiters"))?;
                Ok(employee.full_name())
            },
            |name| UiMessage::Saved {
                message: format!("Mitarbeiter '{name}' gespeichert"),
                reload: Reload::Employees,
            },
        );
    }

    pub fn register_employee(&mut self) {
        let request = match self.signup_form.validate(&self.roles) {
            Ok(r) => r,
            Err(e) => {
                self.form_error = Some(e.user_message());
                return;
            }
        };

        let api = self.api.clone();
        self.spawn(
            async move {
                if api.employee(request.employee_id).await?.is_some() {
                    return Err(AppError::validation(format!(
                        "Die Mitarbeiter-ID {} ist bereits vergeben",
                        request.employee_id
                    )));
                }
                api.signup(&request).await?;
                Ok(request.employee_id)
            },
            |id| UiMessage::Saved {
                message: format!("Mitarbeiter {id} registriert"),
                reload: Reload::Employees,
            },
        );
    }

    pub fn delete_employee(&mut self, employee: Employee) {
        let api = self.api.clone();
        self.spawn(
            async move {
                match api.delete_employee(employee.employee_id).await {
                    Ok(()) => Ok(employee.full_name()),
                    Err(AppError::Forbidden(_)) => Err(AppError::Forbidden(format!(
                        "Sie können den Account von {} {} nicht löschen",
                        employee.first_name, employee.last_name
                    ))),
                    Err(e) => Err(reword(e, "Fehler beim Löschen des Mitarbeiters")),
                }
            },
            |name| UiMessage::Saved {
                message: format!("Mitarbeiter '{name}' gelöscht"),
                reload: Reload::Employees,
            },
        );
    }

    pub fn save_role(&mut self) {
        let role = match self.role_form.validate() {
            Ok(r) => r,
            Err(e) => {
                self.form_error = Some(e.user_message());
                return;
            }
        };

        let api = self.api.clone();
        self.spawn(
            async move {
                if role.role_id.is_some() {
                    api.update_role(&role).await?;
                } else {
                    api.add_role(&role).await?;
                }
                Ok(role.role_name)
            },
            |name| UiMessage::Saved {
                message: format!("Rolle '{name}' gespeichert"),
                reload: Reload::Roles,
            },
        );
    }

    pub fn delete_role(&mut self, id: i32, name: String) {
        let api = self.api.clone();
        self.spawn(
            async move {
                if let Some(role) = api.role(id).await?
                    && !role.employees.is_empty()
                {
                    return Err(AppError::validation(format!(
                        "Die Rolle '{name}' ist noch {} Mitarbeiter(n) zugewiesen",
                        role.employees.len()
                    )));
                }
                api.delete_role(id).await?;
                Ok(name)
            },
            |name| UiMessage::Saved {
                message: format!("Rolle '{name}' gelöscht"),
                reload: Reload::Roles,
            },
        );
    }

    pub fn change_password(&mut self) {
        let update = match self.password_form.validate() {
            Ok(u) => u,
            Err(e) => {
                self.form_error = Some(e.user_message());
                return;
            }
        };

        let api = self.api.clone();
        self.spawn(
            async move { api.update_password(&update).await },
            |_| UiMessage::Saved {
                message: "Passwort erfolgreich geändert".to_string(),
                reload: Reload::Nothing,
            },
        );
    }

    // ---------------------------------------------------------------
    // Products and coupons
    // ---------------------------------------------------------------

    pub fn save_product(&mut self) {
        let draft = match self.product_form.validate(Utc::now().timestamp()) {
            Ok(d) => d,
            Err(e) => {
                self.form_error = Some(e.user_message());
                return;
            }
        };

        let api = self.api.clone();
        self.spawn(
            async move {
                let name = draft.product.product_name.clone();
                if draft.product.product_id.is_empty() {
                    api.add_product_with_stock(&draft.product, draft.stock_quantity)
                        .await
                        .map_err(|e| reword(e, "Fehler beim Erstellen des Produkts"))?;
                } else {
                    api.update_product(&draft.product)
                        .await
                        .map_err(|e| reword(e, "Fehler beim Speichern der Änderungen"))?;
                    let stock = draft.stock(draft.product.product_id.clone());
                    let stock_exists = draft.stock_exists || api.stock(&stock.product_id).await?.is_some();
                    if stock_exists {
                        api.update_stock(&stock)
                            .await
                            .map_err(|e| reword(e, "Fehler beim Speichern des Lagerbestandes"))?;
                    } else {
                        api.add_stock(&stock)
                            .await
                            .map_err(|e| reword(e, "Fehler beim Hinzufügen des Lagerbestandes"))?;
                    }
                }
                Ok(name)
            },
            |name| UiMessage::Saved {
                message: format!("Produkt '{name}' gespeichert"),
                reload: Reload::Products,
            },
        );
    }

    pub fn delete_product(&mut self, product_id: String, name: String) {
        let api = self.api.clone();
        let has_stock = self.stocks.iter().any(|s| s.product_id == product_id);
        self.spawn(
            async move {
                if has_stock {
                    api.delete_stock(&product_id)
                        .await
                        .map_err(|e| reword(e, "Fehler beim Löschen des Lagerbestands"))?;
                }
                api.delete_product(&product_id)
                    .await
                    .map_err(|e| reword(e, "Fehler beim Löschen des Produkts"))?;
                Ok(name)
            },
            |name| UiMessage::Saved {
                message: format!("Produkt '{name}' gelöscht"),
                reload: Reload::Products,
            },
        );
    }

    pub fn save_coupon(&mut self) {
        let coupon = match self.coupon_form.validate(&self.coupons) {
            Ok(c) => c,
            Err(e) => {
                self.form_error = Some(e.user_message());
                return;
            }
        };

        let api = self.api.clone();
        self.spawn(
            async move {
                if api.coupon(&coupon.name).await?.is_some() {
                    return Err(AppError::validation(format!(
                        "Ein Coupon mit dem Namen '{}' existiert bereits",
                        coupon.name
                    )));
                }
                api.add_coupon(&coupon)
                    .await
                    .map_err(|e| reword(e, "Fehler beim Erstellen des Coupons"))?;
                Ok(coupon.name)
            },
            |name| UiMessage::Saved {
                message: format!("Coupon '{name}' erstellt"),
                reload: Reload::Coupons,
            },
        );
    }

    pub fn delete_coupon(&mut self, name: String) {
        let api = self.api.clone();
        self.spawn(
            async move {
                api.delete_coupon(&name).await?;
                Ok(name)
            },
            |name| UiMessage::Saved {
                message: format!("Coupon '{name}' gelöscht"),
                reload: Reload::Coupons,
            },
        );
    }

    // ---------------------------------------------------------------
    // Vacation
    // ---------------------------------------------------------------

    pub fn submit_vacation_request(&mut self) {
        let today = Local::now().date_naive();
        let request = match self.vacation_form.validate(today) {
            Ok(r) => r,
            Err(e) => {
                self.form_error = Some(e.to_string());
                return;
            }
        };

        let api = self.api.clone();
        self.spawn(
            async move {
                if request.antrags_id.is_some() {
                    api.update_vacation_request(&request).await?;
                    Ok("Urlaubsantrag aktualisiert")
                } else {
                    api.add_vacation_request(&request).await?;
                    Ok("Urlaubsantrag eingereicht")
                }
            },
            |message| UiMessage::Saved {
                message: message.to_string(),
                reload: Reload::Vacation,
            },
        );
    }

    pub fn delete_vacation_request(&mut self, id: i32) {
        let api = self.api.clone();
        self.spawn(
            async move { api.delete_vacation_request(id).await },
            |_| UiMessage::Saved {
                message: "Urlaubsantrag gelöscht".to_string(),
                reload: Reload::Vacation,
            },
        );
    }

    /// Send the decision of the open review dialog.
    pub fn submit_review(&mut self) {
        let Some(dialog) = self.review_dialog.take() else {
            return;
        };
        let (Some(id), Some(reviewer)) = (dialog.request.antrags_id, self.employee_id()) else {
            self.error_message = Some("Antrag ID ist ungültig - kann nicht bearbeitet werden".to_string());
            return;
        };

        let today = Local::now().date_naive();
        let api = self.api.clone();
        self.spawn(
            async move {
                api.review_vacation_request(id, dialog.decision, reviewer, &dialog.comment, today)
                    .await
            },
            |reviewed| UiMessage::Saved {
                message: format!("Antrag {} {}", reviewed.antrags_id.unwrap_or_default(), reviewed.status.label()),
                reload: Reload::Vacation,
            },
        );
    }

    // ---------------------------------------------------------------
    // Kassa
    // ---------------------------------------------------------------

    pub fn lookup_ean(&mut self, ean: String) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = api.product_by_ean(&ean).await;
            let _ = tx.send(lookup_message(&ean, result));
        });
    }

    /// Record the sale and open a payment session for it.
    ///
    /// A sale the backend already recorded is not posted again.
    pub fn checkout(&mut self) {
        let checkout = match self.kassa.begin_checkout(self.employee_id(), Utc::now()) {
            Ok(c) => c,
            Err(e) => {
                self.kassa.input.set_error(e.to_string());
                return;
            }
        };

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = async {
                if !checkout.order_recorded {
                    api.kassa_checkout(&checkout.order).await?;
                    let _ = tx.send(UiMessage::SaleRecorded);
                }
                api.create_checkout_session(&checkout.session).await
            }
            .await;

            let msg = match result {
                Ok(client_secret) => UiMessage::CheckoutCompleted {
                    total: checkout.order.total_price,
                    client_secret,
                },
                Err(e) if e.is_auth_error() => UiMessage::SessionExpired,
                Err(e) => {
                    tracing::warn!("Checkout failed: {}", e);
                    UiMessage::CheckoutFailed(e.user_message())
                }
            };
            let _ = tx.send(msg);
        });
    }

    // ---------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------

    fn run_export<F>(&mut self, prefix: &str, label: &str, write: F)
    where
        F: FnOnce(&std::path::Path) -> Result<(), rust_xlsxwriter::XlsxError>,
    {
        let filename = crate::export::generate_export_filename(prefix);
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };

        match write(&path) {
            Ok(()) => {
                let shown = path.display().to_string();
                self.success_message = Some(format!("Exportiert nach: {shown}"));
                self.log_success(format!("{label} exportiert: {shown}"));
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.error_message = Some(format!("Export fehlgeschlagen: {e}"));
                self.log_error(format!("Export fehlgeschlagen: {e}"));
            }
        }
    }

    pub fn export_products(&mut self) {
        let products = self.products.clone();
        let stocks = self.stocks.clone();
        self.run_export("produkte", "Produkte", |path| {
            crate::export::export_products_to_excel(&products, &stocks, path)
        });
    }

    pub fn export_orders(&mut self) {
        let Some(report) = &self.finance_report else {
            self.error_message = Some("Keine Umsätze geladen".to_string());
            return;
        };
        let report = report.clone();
        let employees = self.employees.clone();
        self.run_export("umsaetze", "Umsätze", |path| {
            crate::export::export_orders_to_excel(&report, &employees, path)
        });
    }

    pub fn export_vacation(&mut self, requests: Vec<VacationRequest>) {
        let employees = self.employees.clone();
        self.run_export("urlaubsantraege", "Urlaubsanträge", |path| {
            crate::export::export_vacation_to_excel(&requests, &employees, path)
        });
    }

    // ---------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------

    pub fn test_server_connection(&mut self) {
        let server = self.settings_draft.server.clone();
        let tx = self.tx.clone();
        self.server_testing = true;
        self.server_test = None;

        self.rt.spawn(async move {
            let result = test_server_connection(&server).await;
            let _ = tx.send(UiMessage::ServerTestResult(result));
        });
    }

    /// Validate and persist the settings draft.
    ///
    /// A changed server address needs a fresh client, which ends the session.
    pub fn save_settings(&mut self) {
        if let Err(e) = self.settings_draft.validate() {
            self.form_error = Some(e.to_string());
            return;
        }
        if let Err(e) = self.settings_draft.save(&self.config_path) {
            tracing::error!("Failed to save config: {}", e);
            self.error_message = Some(format!("Einstellungen konnten nicht gespeichert werden: {e}"));
            return;
        }

        let server_changed = self.settings_draft.server.base_url != self.config.server.base_url
            || self.settings_draft.server.timeout_secs != self.config.server.timeout_secs;
        self.config = self.settings_draft.clone();
        self.kassa.show_numpad = self.config.kassa.show_numpad;
        if self.kassa.cart.group_items() != self.config.kassa.group_items {
            self.kassa.cart.toggle_grouping();
        }
        self.form_error = None;
        self.success_message = Some("Einstellungen gespeichert".to_string());
        self.log_success("Einstellungen gespeichert");

        if server_changed {
            match ApiClient::new(&self.config.server) {
                Ok(api) => {
                    self.api = api;
                    self.clear_session();
                    self.log_warning("Serveradresse geändert, bitte erneut anmelden");
                }
                Err(e) => {
                    tracing::error!("Failed to create API client: {}", e);
                    self.error_message = Some(e.user_message());
                }
            }
        }
    }

    // ---------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::LoggedIn(session) => self.on_logged_in(session),
                UiMessage::LoginFailed(e) => {
                    self.is_logging_in = false;
                    self.login_error = Some(e);
                }
                UiMessage::LoggedOut => {
                    self.log_info("Abgemeldet");
                }
                UiMessage::SessionExpired => {
                    if self.session.is_some() {
                        self.log_warning("Sitzung abgelaufen");
                        self.login_error = Some("Sitzung abgelaufen, bitte erneut anmelden".to_string());
                    }
                    self.clear_session();
                }
                UiMessage::EmployeesLoaded(list) => {
                    self.employees = list;
                    self.is_loading = false;
                }
                UiMessage::RolesLoaded(list) => {
                    self.roles = list;
                }
                UiMessage::ProductsLoaded(list) => {
                    self.products = list;
                    self.is_loading = false;
                }
                UiMessage::StocksLoaded(list) => {
                    self.stocks = list;
                }
                UiMessage::CouponsLoaded(list) => {
                    self.coupons = list;
                    self.is_loading = false;
                }
                UiMessage::VacationLoaded(list) => {
                    self.vacation_requests = list;
                }
                UiMessage::MyVacationLoaded(list) => {
                    self.my_vacation_requests = list;
                }
                UiMessage::PriceHistoryLoaded(id, history) => {
                    // Ignore answers for a product that is no longer selected
                    if self.selected_product.as_deref() == Some(id.as_str()) {
                        self.price_history = crate::analytics::sorted_price_history(history);
                    }
                }
                UiMessage::BestSellerLoaded(best) => {
                    self.best_seller = best;
                }
                UiMessage::FinanceLoaded(report) => {
                    self.finance_report = Some(report);
                    self.is_loading = false;
                }
                UiMessage::EanLookedUp(outcome) => {
                    self.kassa.apply_lookup(outcome);
                }
                UiMessage::SaleRecorded => {
                    self.kassa.sale_recorded();
                    self.log_info("Verkauf gespeichert, Zahlungssitzung wird erstellt");
                }
                UiMessage::CheckoutCompleted { total, client_secret } => {
                    self.kassa.finish_checkout();
                    self.log_success(format!("Verkauf über {total:.2} abgeschlossen"));
                    self.last_payment = Some((total, client_secret));
                }
                UiMessage::CheckoutFailed(e) => {
                    self.kassa.checkout_failed(e.clone());
                    self.log_error(e);
                }
                UiMessage::Saved { message, reload } => {
                    self.on_saved(reload);
                    self.success_message = Some(message.clone());
                    self.log_success(message);
                }
                UiMessage::OperationFailed(e) => {
                    self.is_loading = false;
                    self.error_message = Some(e.clone());
                    self.log_error(e);
                }
                UiMessage::ServerTestResult(result) => {
                    self.server_testing = false;
                    self.server_test = Some(result);
                }
            }
        }
    }

    /// Close the dialog that produced a successful write and refresh.
    fn on_saved(&mut self, reload: Reload) {
        self.form_error = None;
        match reload {
            Reload::Employees => {
                self.employee_form.reset();
                self.signup_form.reset();
                self.load_employees();
            }
            Reload::Roles => {
                self.role_form.reset();
                self.load_roles();
            }
            Reload::Products => {
                self.product_form.reset();
                self.load_products();
            }
            Reload::Coupons => {
                self.coupon_form.reset();
                self.load_coupons();
            }
            Reload::Vacation => {
                self.vacation_form.reset();
                self.vacation_form_open = false;
                self.load_vacation();
            }
            Reload::Nothing => {
                self.password_form.reset();
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.label(egui::RichText::new("BINGO").strong());
                ui.separator();

                let Some(session) = self.session.clone() else {
                    return;
                };

                ui.menu_button("Navigation", |ui| {
                    for panel in [
                        Panel::Dashboard,
                        Panel::Kassa,
                        Panel::Products,
                        Panel::Employees,
                        Panel::Roles,
                        Panel::Coupons,
                        Panel::Finance,
                        Panel::Vacation,
                    ] {
                        if session.can_open(panel) && ui.button(panel.name()).clicked() {
                            self.open_panel(panel);
                            ui.close();
                        }
                    }
                });
                ui.menu_button("Konto", |ui| {
                    if ui.button("Passwort ändern").clicked() {
                        self.password_form.reset();
                        self.password_form.is_open = true;
                        self.form_error = None;
                        ui.close();
                    }
                    if ui.button("Einstellungen").clicked() {
                        self.open_panel(Panel::Settings);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Abmelden").clicked() {
                        self.logout();
                        ui.close();
                    }
                });

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(format!(
                        "{} ({})",
                        session.employee.full_name(),
                        session.employee.role_name()
                    ));
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = match &self.session {
                        Some(s) => (colors::SUCCESS, format!("Angemeldet: {}", s.employee.employee_id)),
                        None => (colors::NEUTRAL, "Nicht angemeldet".to_string()),
                    };
                    ui.colored_label(color, text);
                    ui.separator();
                    ui.label(self.api.base_url());

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.is_loading || self.is_logging_in || self.kassa.is_pending() {
                            ui.spinner();
                            ui.label(&self.loading_message);
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Fehler")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Erfolg")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            let (title, message) = match target {
                DeleteTarget::Employee(e) => (
                    "Mitarbeiter löschen",
                    format!("Mitarbeiter '{}' wirklich löschen?", e.full_name()),
                ),
                DeleteTarget::Role(_, name) => ("Rolle löschen", format!("Rolle '{name}' wirklich löschen?")),
                DeleteTarget::Product(_, name) => {
                    ("Produkt löschen", format!("Produkt '{name}' wirklich löschen?"))
                }
                DeleteTarget::Coupon(name) => ("Coupon löschen", format!("Coupon '{name}' wirklich löschen?")),
                DeleteTarget::VacationRequest(id) => {
                    ("Antrag löschen", format!("Urlaubsantrag {id} wirklich löschen?"))
                }
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Abbrechen").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Löschen").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                    });
                });
        }

        if self.password_form.is_open {
            settings_panel::show_password_dialog(self, ctx);
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            match target {
                DeleteTarget::Employee(employee) => {
                    self.log_info(format!("Lösche Mitarbeiter: {}", employee.full_name()));
                    self.delete_employee(employee);
                }
                DeleteTarget::Role(id, name) => {
                    self.log_info(format!("Lösche Rolle: {name}"));
                    self.delete_role(id, name);
                }
                DeleteTarget::Product(id, name) => {
                    self.log_info(format!("Lösche Produkt: {name}"));
                    self.delete_product(id, name);
                }
                DeleteTarget::Coupon(name) => {
                    self.log_info(format!("Lösche Coupon: {name}"));
                    self.delete_coupon(name);
                }
                DeleteTarget::VacationRequest(id) => {
                    self.log_info(format!("Lösche Urlaubsantrag {id}"));
                    self.delete_vacation_request(id);
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        ctx.set_visuals(if self.config.ui.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        // Request repaint during async operations
        if self.is_loading || self.is_logging_in || self.kassa.is_pending() || self.server_testing {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_dialogs(ctx);

        // Panels stay out of reach once the session is gone
        if self.session.is_none() {
            self.current_panel = Panel::Login;
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Login => login_panel::show(self, ui),
            Panel::Dashboard => {
                if let Some(next) = dashboard::show(self, ui) {
                    self.open_panel(next);
                }
            }
            Panel::Kassa => {
                if kassa_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Products => {
                if product_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Employees => {
                if employee_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Roles => {
                if role_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Coupons => {
                if coupon_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Finance => {
                if finance_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Vacation => {
                if vacation_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Settings => {
                if settings_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
        });
    }
}

/// Map a task error to the message sent to the UI.
fn failure_message(e: AppError) -> UiMessage {
    if e.is_auth_error() {
        return UiMessage::SessionExpired;
    }
    tracing::warn!("Request failed: {}", e);
    UiMessage::OperationFailed(e.user_message())
}

/// Message for a finished EAN lookup; an expired session ends the session.
fn lookup_message(ean: &str, result: crate::Result<Option<Product>>) -> UiMessage {
    match result {
        Ok(Some(product)) => UiMessage::EanLookedUp(LookupOutcome::Found(product)),
        Ok(None) => UiMessage::EanLookedUp(LookupOutcome::NotFound),
        Err(e) if e.is_auth_error() => UiMessage::SessionExpired,
        Err(e) => {
            tracing::warn!("EAN lookup for {} failed: {}", ean, e);
            UiMessage::EanLookedUp(LookupOutcome::Failed)
        }
    }
}

/// Replace generic server errors with a message naming the failed action.
///
/// Errors that already carry a user-facing text are kept.
fn reword(e: AppError, message: &str) -> AppError {
    match e {
        AppError::Api { status, message: detail } => {
            tracing::warn!("{}: {} {}", message, status, detail);
            AppError::Validation(message.to_string())
        }
        other => other,
    }
}

/// Check that the backend answers at the configured address.
pub(super) async fn test_server_connection(server: &crate::config::ServerConfig) -> Result<(), String> {
    let api = ApiClient::new(server).map_err(|e| e.user_message())?;
    let status = api.test_connection().await.map_err(|e| e.user_message())?;
    tracing::info!("Server test {} -> {}", api.base_url(), status);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(rights: &[&str]) -> Session {
        Session {
            employee: Employee {
                employee_id: 1,
                first_name: "Anna".into(),
                last_name: "Berg".into(),
                ..Default::default()
            },
            rights: AccessRights::new(rights.iter().copied()),
        }
    }

    #[test]
    fn test_panel_gating() {
        let cashier = session(&["kasse", "product.read"]);
        assert!(cashier.can_open(Panel::Kassa));
        assert!(cashier.can_open(Panel::Products));
        assert!(cashier.can_open(Panel::Vacation));
        assert!(cashier.can_open(Panel::Settings));
        assert!(!cashier.can_open(Panel::Finance));
        assert!(!cashier.can_open(Panel::Roles));
        assert!(!cashier.can_open(Panel::Login));

        let admin = session(&["admin"]);
        for panel in [Panel::Kassa, Panel::Employees, Panel::Roles, Panel::Coupons, Panel::Finance] {
            assert!(admin.can_open(panel), "{}", panel.name());
        }
    }

    #[test]
    fn test_required_permissions() {
        assert_eq!(Panel::Employees.required_permission(), Some("user.read"));
        assert_eq!(Panel::Coupons.required_permission(), Some("coupons.read"));
        assert_eq!(Panel::Vacation.required_permission(), None);
    }

    #[test]
    fn test_reword_keeps_user_messages() {
        let api = AppError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".into(),
        };
        assert_eq!(reword(api, "Fehler beim Löschen").user_message(), "Fehler beim Löschen");

        let forbidden = AppError::Forbidden("Keine Berechtigung".into());
        assert_eq!(reword(forbidden, "x").user_message(), "Keine Berechtigung");
    }

    #[test]
    fn test_failure_message() {
        assert!(matches!(failure_message(AppError::Unauthorized), UiMessage::SessionExpired));
        match failure_message(AppError::validation("kaputt")) {
            UiMessage::OperationFailed(msg) => assert_eq!(msg, "kaputt"),
            _ => panic!("expected OperationFailed"),
        }
    }

    #[test]
    fn test_lookup_message() {
        assert!(matches!(
            lookup_message("42", Err(AppError::Unauthorized)),
            UiMessage::SessionExpired
        ));
        assert!(matches!(
            lookup_message("42", Ok(None)),
            UiMessage::EanLookedUp(LookupOutcome::NotFound)
        ));
        assert!(matches!(
            lookup_message("42", Err(AppError::not_found("42"))),
            UiMessage::EanLookedUp(LookupOutcome::Failed)
        ));
        assert!(matches!(
            lookup_message("42", Ok(Some(Product::default()))),
            UiMessage::EanLookedUp(LookupOutcome::Found(_))
        ));
    }
}
