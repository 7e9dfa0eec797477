use serde::Serialize;

use crate::domain::UserCredentials;
use crate::error::{MarketError, ValidationError};
use crate::pipeline::{Endpoint, RequestPipeline};

const LOGIN: Endpoint = Endpoint::public("login").with_schema(UserCredentials::schema);
const REGISTER: Endpoint = Endpoint::public("register");
const CHANGE_PASSWORD: Endpoint = Endpoint::public("change_password");

/// Who is logging in: exactly one of user name or e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentity {
    UserName(String),
    Email(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct LoginParams {
    identity: LoginIdentity,
    password: String,
}

impl LoginParams {
    pub fn new(identity: LoginIdentity, password: impl Into<String>) -> Result<Self, ValidationError> {
        let login = match &identity {
            LoginIdentity::UserName(name) => name,
            LoginIdentity::Email(email) => email,
        };
        if login.trim().is_empty() {
            return Err(ValidationError::MissingLogin);
        }

        Ok(Self {
            identity,
            password: non_empty("password", password.into())?,
        })
    }

    pub fn with_user_name(
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(LoginIdentity::UserName(user_name.into()), password)
    }

    pub fn with_email(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(LoginIdentity::Email(email.into()), password)
    }

    pub fn identity(&self) -> &LoginIdentity {
        &self.identity
    }
}

impl std::fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginParams")
            .field("identity", &self.identity)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct RegisterParams {
    user_name: String,
    email: String,
    password: String,
}

impl RegisterParams {
    pub fn new(
        user_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_name: non_empty("user_name", user_name.into())?,
            email: non_empty("email", email.into())?,
            password: non_empty("password", password.into())?,
        })
    }
}

impl std::fmt::Debug for RegisterParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterParams")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ChangePasswordParams {
    email: String,
    current_password: String,
    new_password: String,
}

impl ChangePasswordParams {
    pub fn new(
        email: impl Into<String>,
        current_password: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: non_empty("email", email.into())?,
            current_password: non_empty("current_password", current_password.into())?,
            new_password: non_empty("new_password", new_password.into())?,
        })
    }
}

impl std::fmt::Debug for ChangePasswordParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordParams")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub(crate) fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(value)
    }
}

#[derive(Serialize)]
struct CredentialsWire<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    password: &'a str,
}

#[derive(Serialize)]
struct ChangePasswordWire<'a> {
    email: &'a str,
    current_password: &'a str,
    new_password: &'a str,
}

/// Account creation and login.
#[derive(Clone, Copy)]
pub struct Auth<'a> {
    pipeline: RequestPipeline<'a>,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(pipeline: RequestPipeline<'a>) -> Self {
        Self { pipeline }
    }

    /// Exchange credentials for a session token. The token is returned, not
    /// stored; see [`MarketClient::login`](crate::MarketClient::login).
    pub async fn login(&self, params: &LoginParams) -> Result<UserCredentials, MarketError> {
        let (name, email) = match &params.identity {
            LoginIdentity::UserName(name) => (Some(name.as_str()), None),
            LoginIdentity::Email(email) => (None, Some(email.as_str())),
        };

        self.pipeline
            .fetch(
                &LOGIN,
                &CredentialsWire {
                    name,
                    email,
                    password: &params.password,
                },
            )
            .await
    }

    pub async fn register(&self, params: &RegisterParams) -> Result<(), MarketError> {
        self.pipeline
            .send(
                &REGISTER,
                &CredentialsWire {
                    name: Some(&params.user_name),
                    email: Some(&params.email),
                    password: &params.password,
                },
            )
            .await
    }

    pub async fn change_password(&self, params: &ChangePasswordParams) -> Result<(), MarketError> {
        self.pipeline
            .send(
                &CHANGE_PASSWORD,
                &ChangePasswordWire {
                    email: &params.email,
                    current_password: &params.current_password,
                    new_password: &params.new_password,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_identity_and_password() {
        assert_eq!(
            LoginParams::with_user_name(" ", "secret"),
            Err(ValidationError::MissingLogin)
        );
        assert_eq!(
            LoginParams::with_email("a@b.c", ""),
            Err(ValidationError::EmptyField { field: "password" })
        );
        assert!(LoginParams::with_email("a@b.c", "secret").is_ok());
    }

    #[test]
    fn debug_output_hides_passwords() {
        let login = LoginParams::with_user_name("dev", "hunter2").expect("valid");
        let register = RegisterParams::new("dev", "dev@example.test", "hunter2").expect("valid");
        let change = ChangePasswordParams::new("dev@example.test", "hunter2", "hunter3").expect("valid");

        for rendered in [
            format!("{login:?}"),
            format!("{register:?}"),
            format!("{change:?}"),
        ] {
            assert!(!rendered.contains("hunter"), "leaked password in {rendered}");
        }
    }

    #[test]
    fn register_rejects_empty_fields() {
        assert_eq!(
            RegisterParams::new("dev", "", "pw"),
            Err(ValidationError::EmptyField { field: "email" })
        );
    }
}
