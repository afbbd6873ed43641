use strum_macros::Display;
use strum_macros::EnumIter;

/// Top-level screen flow: splash, then the sign-in form, then the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Splash,
    Auth,
    App,
}

/// Section shown while signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Route {
    #[default]
    Home,
    Features,
    Dashboard,
    About,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn fields(self) -> &'static [AuthField] {
        match self {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Signup => &[AuthField::Name, AuthField::Email, AuthField::Password],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome back",
            AuthMode::Signup => "Create your account",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Signup => "Create Account",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
}

impl AuthField {
    pub fn label(self) -> &'static str {
        match self {
            AuthField::Name => "Full Name",
            AuthField::Email => "Email",
            AuthField::Password => "Password",
        }
    }
}

/// Sign-in/sign-up form. Nothing is verified: any complete form signs in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    /// Set when a submission was rejected.
    pub hint: Option<String>,
}

impl AuthForm {
    pub fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Name => &self.name,
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
        }
    }

    pub(crate) fn set(&mut self, field: AuthField, value: String) {
        match field {
            AuthField::Name => self.name = value,
            AuthField::Email => self.email = value,
            AuthField::Password => self.password = value,
        }
    }

    /// First required field of the current mode that is empty. Whitespace
    /// counts as a value.
    pub fn first_missing(&self) -> Option<AuthField> {
        self.mode
            .fields()
            .iter()
            .copied()
            .find(|field| self.value(*field).is_empty())
    }
}

/// Free-text draft fields. Option fields are changed through their own
/// select actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    PanicUserId,
    EscalationContacts,
}
