use openai_client::SecretString;
use subtle::ConstantTimeEq;

/// The single username/password pair allowed to request tokens.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    username: String,
    password: SecretString,
}

impl ApiCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Constant-time check of a login attempt.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.expose().as_bytes().ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let creds = ApiCredentials::new("pharmacist", "hunter2");
        assert!(creds.verify("pharmacist", "hunter2"));
        assert!(!creds.verify("pharmacist", "hunter3"));
        assert!(!creds.verify("admin", "hunter2"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn test_password_not_in_debug() {
        let creds = ApiCredentials::new("pharmacist", "hunter2");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
