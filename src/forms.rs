//! Form state and validation for the management dialogs.
//!
//! Each form keeps the raw text the user typed and turns it into a request
//! payload in `validate`. Messages are the German texts shown inline.

use crate::error::{AppError, Result};
use crate::kassa::cart::parse_amount;
use crate::models::permission::toggle_permission;
use crate::models::{
    Coupon, CouponDuration, Employee, LoginRequest, NewCoupon, PasswordUpdate, Product, Role, SignupRequest, Stock,
};

pub const MSG_FILL_ALL: &str = "Bitte füllen Sie alle Felder aus";
pub const MSG_PASSWORD_MISMATCH: &str = "Die neuen Passwörter stimmen nicht überein";
pub const MSG_PASSWORD_WEAK: &str = "Das neue Passwort muss mindestens 8 Zeichen lang sein und einen Großbuchstaben, einen Kleinbuchstaben und eine Zahl enthalten";
pub const MSG_PASSWORD_UNCHANGED: &str = "Das neue Passwort darf nicht mit dem alten Passwort identisch sein";
pub const MSG_COUPON_DISCOUNT: &str = "Bitte entweder 'amountOff' ODER 'percentOff' setzen – aber nicht beides.";
pub const MSG_ID_NOT_NUMBER: &str = "ID muss eine Zahl sein!";
pub const MSG_PASSWORD_EMPTY: &str = "Passwort darf nicht leer sein!";
pub const MSG_REPEAT_MISMATCH: &str = "Passwörter sind nicht identisch!";

/// Product create/edit dialog.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub ean: String,
    pub list_price: String,
    pub cost_price: String,
    pub currency: String,
    pub tax_included: bool,
    pub active: bool,
    pub stock: String,
    /// Product being edited.
    pub original: Option<Product>,
    /// The edited product already has a stock record.
    pub has_stock: bool,
    pub is_open: bool,
}

/// Validated product plus the stock level to write with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub product: Product,
    pub stock_quantity: i32,
    /// Update the existing stock record instead of creating one.
    pub stock_exists: bool,
}

impl ProductDraft {
    pub fn stock(&self, product_id: impl Into<String>) -> Stock {
        Stock::initial(product_id, self.stock_quantity)
    }
}

impl ProductForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Blank form for a new product.
    pub fn create(currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            tax_included: true,
            active: true,
            stock: "0".to_string(),
            is_open: true,
            ..Default::default()
        }
    }

    pub fn edit(product: &Product, stock: Option<&Stock>) -> Self {
        Self {
            name: product.product_name.clone(),
            description: product.product_description.clone(),
            ean: product.upc_code.clone(),
            list_price: format!("{:.2}", product.list_price),
            cost_price: format!("{:.2}", product.cost_price),
            currency: product.currency.to_uppercase(),
            tax_included: product.tax_included_in_price,
            active: product.active,
            stock: stock.map(|s| s.quantity).unwrap_or(0).to_string(),
            original: Some(product.clone()),
            has_stock: stock.is_some(),
            is_open: true,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.original.is_some()
    }

    /// `now` is the epoch-seconds timestamp written to `created`/`updated`.
    pub fn validate(&self, now: i64) -> Result<ProductDraft> {
        let name = required(&self.name, "Produktname ist erforderlich")?;
        let description = required(&self.description, "Produktbeschreibung ist erforderlich")?;
        let ean = required(&self.ean, "EAN ist erforderlich")?;
        if !ean.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("EAN darf nur Ziffern enthalten"));
        }
        let currency = required(&self.currency, "Währung ist erforderlich")?;

        let list_price = positive_price(&self.list_price, "Verkaufspreis")?;
        let cost_price = positive_price(&self.cost_price, "Einkaufspreis")?;
        if list_price < cost_price {
            return Err(AppError::validation(
                "Der Verkaufspreis darf nicht unter dem Einkaufspreis liegen",
            ));
        }

        let stock_quantity: i32 = self
            .stock
            .trim()
            .parse()
            .ok()
            .filter(|q| *q >= 0)
            .ok_or_else(|| AppError::validation("Lagerbestand muss eine ganze Zahl ab 0 sein"))?;

        let product = match &self.original {
            Some(original) => Product {
                product_name: name,
                product_description: description,
                list_price,
                cost_price,
                upc_code: ean,
                updated: now,
                active: self.active,
                currency,
                tax_included_in_price: self.tax_included,
                ..original.clone()
            },
            None => Product {
                product_name: name,
                product_id: String::new(),
                product_description: description,
                list_price,
                cost_price,
                upc_code: ean,
                created: now,
                updated: now,
                active: self.active,
                currency,
                tax_included_in_price: self.tax_included,
                price_id: String::new(),
            },
        };

        Ok(ProductDraft {
            product,
            stock_quantity,
            stock_exists: self.has_stock,
        })
    }
}

fn required(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::validation(message))
    } else {
        Ok(value.to_string())
    }
}

fn positive_price(text: &str, field: &str) -> Result<f64> {
    parse_amount(text)
        .filter(|v| *v > 0.0)
        .ok_or_else(|| AppError::validation(format!("{field} muss größer als 0 sein")))
}

/// New coupon dialog. Amounts are entered in cents.
#[derive(Debug, Clone)]
pub struct CouponForm {
    pub name: String,
    pub amount_off: String,
    pub percent_off: String,
    pub currency: String,
    pub duration: CouponDuration,
    pub is_open: bool,
}

impl Default for CouponForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount_off: "0".to_string(),
            percent_off: "0".to_string(),
            currency: "EUR".to_string(),
            duration: CouponDuration::Once,
            is_open: false,
        }
    }
}

impl CouponForm {
    pub const CURRENCIES: [&'static str; 2] = ["EUR", "USD"];

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self, existing: &[Coupon]) -> Result<NewCoupon> {
        let name = required(&self.name, "Name ist erforderlich")?;
        if existing.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
            return Err(AppError::validation(format!("Ein Coupon mit dem Namen '{name}' existiert bereits")));
        }

        let amount_off = parse_or_zero::<i32>(&self.amount_off)
            .filter(|a| *a >= 0)
            .ok_or_else(|| AppError::validation("Ungültiger Betrag"))?;
        let percent_off = parse_amount(&self.percent_off)
            .or_else(|| self.percent_off.trim().is_empty().then_some(0.0))
            .ok_or_else(|| AppError::validation("Ungültiger Prozentsatz"))? as f32;

        if (amount_off > 0) == (percent_off > 0.0) {
            return Err(AppError::validation(MSG_COUPON_DISCOUNT));
        }
        if percent_off > 100.0 {
            return Err(AppError::validation("Prozentsatz darf höchstens 100 sein"));
        }

        Ok(NewCoupon {
            name,
            amount_off: (amount_off > 0).then_some(amount_off),
            currency: self.currency.clone(),
            duration: self.duration,
            percent_off: (percent_off > 0.0).then_some(percent_off),
        })
    }
}

fn parse_or_zero<T: std::str::FromStr + Default>(text: &str) -> Option<T> {
    let text = text.trim();
    if text.is_empty() { Some(T::default()) } else { text.parse().ok() }
}

/// Own password change.
#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub is_open: bool,
}

impl PasswordForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<PasswordUpdate> {
        if self.old_password.is_empty() || self.new_password.is_empty() || self.confirm_password.is_empty() {
            return Err(AppError::validation(MSG_FILL_ALL));
        }
        if self.new_password != self.confirm_password {
            return Err(AppError::validation(MSG_PASSWORD_MISMATCH));
        }
        if !is_strong_password(&self.new_password) {
            return Err(AppError::validation(MSG_PASSWORD_WEAK));
        }
        if self.new_password == self.old_password {
            return Err(AppError::validation(MSG_PASSWORD_UNCHANGED));
        }
        Ok(PasswordUpdate {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

/// At least 8 characters from `[A-Za-z0-9@$!%*?&]` with a lowercase letter,
/// an uppercase letter and a digit.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@$!%*?&".contains(c))
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub employee_id: String,
    pub password: String,
}

impl LoginForm {
    pub fn with_last_id(last_employee_id: Option<i32>) -> Self {
        Self {
            employee_id: last_employee_id.map(|id| id.to_string()).unwrap_or_default(),
            password: String::new(),
        }
    }

    pub fn validate(&self) -> Result<LoginRequest> {
        let employee_id = parse_employee_id(&self.employee_id)?;
        if self.password.is_empty() {
            return Err(AppError::validation(MSG_PASSWORD_EMPTY));
        }
        Ok(LoginRequest {
            employee_id,
            password: self.password.clone(),
        })
    }
}

fn parse_employee_id(text: &str) -> Result<i32> {
    text.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::validation(MSG_ID_NOT_NUMBER))
}

/// Registration of a new employee by an administrator.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub repeat_password: String,
    pub role_id: Option<i32>,
    pub is_open: bool,
}

impl SignupForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self, roles: &[Role]) -> Result<SignupRequest> {
        let employee_id = parse_employee_id(&self.employee_id)?;
        let first_name = required(&self.first_name, MSG_FILL_ALL)?;
        let last_name = required(&self.last_name, MSG_FILL_ALL)?;
        if self.password.is_empty() {
            return Err(AppError::validation(MSG_PASSWORD_EMPTY));
        }
        if self.password != self.repeat_password {
            return Err(AppError::validation(MSG_REPEAT_MISMATCH));
        }
        Ok(SignupRequest {
            employee_id,
            first_name,
            last_name,
            password: self.password.clone(),
            role: find_role(roles, self.role_id),
        })
    }
}

fn find_role(roles: &[Role], role_id: Option<i32>) -> Option<Role> {
    let id = role_id?;
    roles.iter().find(|r| r.role_id == Some(id)).map(|r| Role {
        employees: Vec::new(),
        ..r.clone()
    })
}

/// Admin edit of an existing employee. An empty password keeps the current one.
#[derive(Debug, Clone, Default)]
pub struct EmployeeForm {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role_id: Option<i32>,
    pub is_open: bool,
}

impl EmployeeForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn edit(employee: &Employee) -> Self {
        Self {
            employee_id: employee.employee_id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            password: String::new(),
            role_id: employee.role.as_ref().and_then(|r| r.role_id),
            is_open: true,
        }
    }

    pub fn validate(&self, roles: &[Role]) -> Result<Employee> {
        let first_name = required(&self.first_name, MSG_FILL_ALL)?;
        let last_name = required(&self.last_name, MSG_FILL_ALL)?;
        Ok(Employee {
            employee_id: self.employee_id,
            first_name,
            last_name,
            password: Some(self.password.clone()).filter(|p| !p.is_empty()),
            role: find_role(roles, self.role_id),
        })
    }
}

/// Role create/edit dialog.
#[derive(Debug, Clone, Default)]
pub struct RoleForm {
    pub role_id: Option<i32>,
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
    pub is_open: bool,
}

impl RoleForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn create() -> Self {
        Self {
            is_open: true,
            ..Default::default()
        }
    }

    pub fn edit(role: &Role) -> Self {
        Self {
            role_id: role.role_id,
            name: role.role_name.clone(),
            description: role.description.clone(),
            permissions: role.role_permissions.clone(),
            is_open: true,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.role_id.is_some()
    }

    pub fn has(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn toggle(&mut self, permission: &str) {
        toggle_permission(&mut self.permissions, permission);
    }

    pub fn validate(&self) -> Result<Role> {
        let role = Role {
            role_id: self.role_id,
            role_name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            role_permissions: self.permissions.clone(),
            employees: Vec::new(),
        };
        role.validate().map_err(AppError::Validation)?;
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<impl std::fmt::Debug>) -> String {
        result.unwrap_err().user_message()
    }

    fn filled_product() -> ProductForm {
        ProductForm {
            name: "Kaffee".into(),
            description: "Bohnen 500g".into(),
            ean: "4006381333931".into(),
            list_price: "7,99".into(),
            cost_price: "4.50".into(),
            stock: "12".into(),
            ..ProductForm::create("EUR")
        }
    }

    #[test]
    fn test_new_product() {
        let draft = filled_product().validate(1_700_000_000).unwrap();
        assert_eq!(draft.product.list_price, 7.99);
        assert_eq!(draft.product.cost_price, 4.5);
        assert_eq!(draft.product.created, 1_700_000_000);
        assert!(draft.product.product_id.is_empty());
        assert!(draft.product.active);
        assert_eq!(draft.stock_quantity, 12);
        assert!(!draft.stock_exists);

        let stock = draft.stock("prod_1");
        assert_eq!(stock.product_id, "prod_1");
        assert!(stock.should_be_repurchased);
    }

    #[test]
    fn test_product_rules() {
        let mut form = filled_product();
        form.name = " ".into();
        assert_eq!(message(form.validate(0)), "Produktname ist erforderlich");

        let mut form = filled_product();
        form.ean = "40a6".into();
        assert_eq!(message(form.validate(0)), "EAN darf nur Ziffern enthalten");

        let mut form = filled_product();
        form.list_price = "0".into();
        assert_eq!(message(form.validate(0)), "Verkaufspreis muss größer als 0 sein");

        let mut form = filled_product();
        form.cost_price = "9".into();
        assert_eq!(
            message(form.validate(0)),
            "Der Verkaufspreis darf nicht unter dem Einkaufspreis liegen"
        );

        let mut form = filled_product();
        form.cost_price = "7.99".into();
        assert!(form.validate(0).is_ok());

        let mut form = filled_product();
        form.stock = "-1".into();
        assert_eq!(message(form.validate(0)), "Lagerbestand muss eine ganze Zahl ab 0 sein");
    }

    #[test]
    fn test_edit_product_keeps_ids() {
        let original = Product {
            product_id: "prod_7".into(),
            price_id: "price_7".into(),
            created: 100,
            ..filled_product().validate(100).unwrap().product
        };
        let stock = Stock::initial("prod_7", 3);
        let mut form = ProductForm::edit(&original, Some(&stock));
        assert!(form.is_editing());
        assert_eq!(form.list_price, "7.99");
        assert_eq!(form.stock, "3");

        form.list_price = "8.49".into();
        let draft = form.validate(200).unwrap();
        assert_eq!(draft.product.product_id, "prod_7");
        assert_eq!(draft.product.price_id, "price_7");
        assert_eq!(draft.product.created, 100);
        assert_eq!(draft.product.updated, 200);
        assert_eq!(draft.product.list_price, 8.49);
        assert!(draft.stock_exists);
    }

    #[test]
    fn test_coupon_exclusive_discount() {
        let mut form = CouponForm {
            name: "SOMMER".into(),
            ..Default::default()
        };
        assert_eq!(message(form.validate(&[])), MSG_COUPON_DISCOUNT);

        form.amount_off = "500".into();
        form.percent_off = "10".into();
        assert_eq!(message(form.validate(&[])), MSG_COUPON_DISCOUNT);

        form.percent_off = "0".into();
        let coupon = form.validate(&[]).unwrap();
        assert_eq!(coupon.amount_off, Some(500));
        assert_eq!(coupon.percent_off, None);
        assert_eq!(coupon.currency, "EUR");
        assert_eq!(coupon.duration, CouponDuration::Once);

        form.amount_off = "".into();
        form.percent_off = "150".into();
        assert_eq!(message(form.validate(&[])), "Prozentsatz darf höchstens 100 sein");

        form.percent_off = "15".into();
        assert_eq!(form.validate(&[]).unwrap().percent_off, Some(15.0));
    }

    #[test]
    fn test_coupon_name_rules() {
        let form = CouponForm {
            percent_off: "5".into(),
            ..Default::default()
        };
        assert_eq!(message(form.validate(&[])), "Name ist erforderlich");

        let existing = Coupon {
            id: "c1".into(),
            name: "Sommer".into(),
            amount_off: None,
            currency: None,
            duration: CouponDuration::Once,
            percent_off: Some(5.0),
        };
        let form = CouponForm {
            name: "SOMMER".into(),
            ..form
        };
        assert!(form.validate(&[existing]).is_err());
    }

    #[test]
    fn test_password_rule_order() {
        let mut form = PasswordForm::default();
        assert_eq!(message(form.validate()), MSG_FILL_ALL);

        form.old_password = "Altes1234".into();
        form.new_password = "Neues1234".into();
        form.confirm_password = "Neues12345".into();
        assert_eq!(message(form.validate()), MSG_PASSWORD_MISMATCH);

        form.new_password = "kurz1A".into();
        form.confirm_password = "kurz1A".into();
        assert_eq!(message(form.validate()), MSG_PASSWORD_WEAK);

        form.new_password = "Altes1234".into();
        form.confirm_password = "Altes1234".into();
        assert_eq!(message(form.validate()), MSG_PASSWORD_UNCHANGED);

        form.new_password = "Neues1234!".into();
        form.confirm_password = "Neues1234!".into();
        let update = form.validate().unwrap();
        assert_eq!(update.new_password, "Neues1234!");
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Abcdefg1"));
        assert!(is_strong_password("Abc@$!%*?&1"));
        assert!(!is_strong_password("abcdefg1"));
        assert!(!is_strong_password("ABCDEFG1"));
        assert!(!is_strong_password("Abcdefgh"));
        assert!(!is_strong_password("Abc1"));
        assert!(!is_strong_password("Abcdefg1#"));
        assert!(!is_strong_password("Äbcdefg1"));
    }

    #[test]
    fn test_login() {
        let mut form = LoginForm::with_last_id(Some(1001));
        assert_eq!(form.employee_id, "1001");
        assert_eq!(message(form.validate()), MSG_PASSWORD_EMPTY);

        form.employee_id = "abc".into();
        form.password = "x".into();
        assert_eq!(message(form.validate()), MSG_ID_NOT_NUMBER);

        form.employee_id = " 42 ".into();
        assert_eq!(form.validate().unwrap().employee_id, 42);
    }

    fn roles() -> Vec<Role> {
        vec![Role {
            role_id: Some(2),
            role_name: "Kassierer".into(),
            description: String::new(),
            role_permissions: vec!["kasse".into()],
            employees: vec![Employee::default()],
        }]
    }

    #[test]
    fn test_signup() {
        let mut form = SignupForm {
            employee_id: "1002".into(),
            first_name: "Anna".into(),
            last_name: "Berg".into(),
            password: "Geheim123".into(),
            repeat_password: "Geheim124".into(),
            role_id: Some(2),
            is_open: true,
        };
        assert_eq!(message(form.validate(&roles())), MSG_REPEAT_MISMATCH);

        form.repeat_password = "Geheim123".into();
        let request = form.validate(&roles()).unwrap();
        assert_eq!(request.employee_id, 1002);
        let role = request.role.unwrap();
        assert_eq!(role.role_name, "Kassierer");
        assert!(role.employees.is_empty());

        form.role_id = Some(99);
        assert!(form.validate(&roles()).unwrap().role.is_none());

        form.last_name.clear();
        assert_eq!(message(form.validate(&roles())), MSG_FILL_ALL);
    }

    #[test]
    fn test_employee_edit_keeps_password() {
        let employee = Employee {
            employee_id: 7,
            first_name: "Max".into(),
            last_name: "Muster".into(),
            password: None,
            role: roles().into_iter().next(),
        };
        let mut form = EmployeeForm::edit(&employee);
        assert_eq!(form.role_id, Some(2));

        let updated = form.validate(&roles()).unwrap();
        assert_eq!(updated.password, None);
        assert_eq!(updated.employee_id, 7);

        form.password = "Neu12345".into();
        form.role_id = None;
        let updated = form.validate(&roles()).unwrap();
        assert_eq!(updated.password.as_deref(), Some("Neu12345"));
        assert!(updated.role.is_none());
    }

    #[test]
    fn test_role_form() {
        let mut form = RoleForm::create();
        assert!(!form.is_editing());
        assert_eq!(message(form.validate()), "Rollenname ist erforderlich");

        form.name = " Lager ".into();
        form.toggle("product.create");
        assert!(form.has("product.read"));
        let role = form.validate().unwrap();
        assert_eq!(role.role_name, "Lager");
        assert_eq!(role.role_id, None);

        let form = RoleForm::edit(&roles()[0]);
        assert!(form.is_editing());
        assert!(form.has("kasse"));
    }
}
