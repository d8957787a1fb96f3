//! Sign-up form checks.

pub const NAME_LIMIT: usize = 20;
pub const USERNAME_LIMIT: usize = 20;
pub const PASSWORD_MIN: usize = 8;

pub const MISSING_FIELDS: &str = "Not all fields have been filled in!";
pub const USERNAME_CHARSET: &str = "Username must only contain letters and numbers!";
pub const USERNAME_TAKEN: &str = "Username has already been registered!";
pub const USERNAME_TOO_LONG: &str = "Username exceeds 20 characters!";
pub const FIRST_NAME_TOO_LONG: &str = "First name exceeds 20 characters!";
pub const LAST_NAME_TOO_LONG: &str = "Last name exceeds 20 characters!";
pub const FIRST_NAME_CHARSET: &str = "First name must only contain letters and spaces!";
pub const LAST_NAME_CHARSET: &str = "Last name must only contain letters and spaces!";
pub const WEAK_PASSWORD: &str = "Password does not meet requirements! It must contain at least \
                                 eight characters, including at least one number.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match!";

#[derive(Debug, Clone, Copy)]
pub struct RegistrationForm<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

fn is_name(value: &str) -> bool {
    value.chars().all(|c| c.is_alphabetic() || c.is_whitespace())
}

/// Check a sign-up form. `username_taken` comes from the account store.
///
/// An empty username also fails the character rule, so it reports both
/// messages.
pub fn validate_registration(
    form: &RegistrationForm<'_>,
    username_taken: bool,
) -> Result<(), Vec<String>> {
    let mut errors: Vec<&str> = Vec::new();

    if [
        form.username,
        form.first_name,
        form.last_name,
        form.password,
        form.password_confirm,
    ]
    .iter()
    .any(|v| v.is_empty())
    {
        errors.push(MISSING_FIELDS);
    }

    if form.username.is_empty() || !form.username.chars().all(char::is_alphanumeric) {
        errors.push(USERNAME_CHARSET);
    }
    if username_taken {
        errors.push(USERNAME_TAKEN);
    }
    if form.username.chars().count() > USERNAME_LIMIT {
        errors.push(USERNAME_TOO_LONG);
    }

    if form.first_name.chars().count() > NAME_LIMIT {
        errors.push(FIRST_NAME_TOO_LONG);
    }
    if form.last_name.chars().count() > NAME_LIMIT {
        errors.push(LAST_NAME_TOO_LONG);
    }
    if !is_name(form.first_name) {
        errors.push(FIRST_NAME_CHARSET);
    }
    if !is_name(form.last_name) {
        errors.push(LAST_NAME_CHARSET);
    }

    if form.password.chars().count() < PASSWORD_MIN
        || !form.password.chars().any(|c| c.is_ascii_digit())
    {
        errors.push(WEAK_PASSWORD);
    }
    if form.password != form.password_confirm {
        errors.push(PASSWORD_MISMATCH);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form<'a>(username: &'a str, password: &'a str, confirm: &'a str) -> RegistrationForm<'a> {
        RegistrationForm {
            username,
            first_name: "Ada",
            last_name: "Lovelace",
            password,
            password_confirm: confirm,
        }
    }

    #[test]
    fn accepts_a_valid_form() {
        assert!(validate_registration(&form("ada1815", "engine123", "engine123"), false).is_ok());
    }

    #[test]
    fn empty_username() {
        assert_eq!(
            validate_registration(&form("", "engine123", "engine123"), false).unwrap_err(),
            vec![MISSING_FIELDS.to_string(), USERNAME_CHARSET.to_string()]
        );
    }

    #[test]
    fn username_rules() {
        assert_eq!(
            validate_registration(&form("ada_l", "engine123", "engine123"), false).unwrap_err(),
            vec![USERNAME_CHARSET.to_string()]
        );
        assert_eq!(
            validate_registration(&form("ada", "engine123", "engine123"), true).unwrap_err(),
            vec![USERNAME_TAKEN.to_string()]
        );
        assert_eq!(
            validate_registration(&form(&"a".repeat(21), "engine123", "engine123"), false)
                .unwrap_err(),
            vec![USERNAME_TOO_LONG.to_string()]
        );
    }

    #[test]
    fn name_rules() {
        let mut f = form("ada", "engine123", "engine123");
        f.first_name = "Ada Augusta";
        assert!(validate_registration(&f, false).is_ok());

        f.first_name = "Ada2";
        f.last_name = "Byron-King Lovelace Noel";
        assert_eq!(
            validate_registration(&f, false).unwrap_err(),
            vec![
                LAST_NAME_TOO_LONG.to_string(),
                FIRST_NAME_CHARSET.to_string(),
                LAST_NAME_CHARSET.to_string(),
            ]
        );
    }

    #[test]
    fn password_rules() {
        assert_eq!(
            validate_registration(&form("ada", "engine12", "engine12"), false),
            Ok(())
        );
        assert_eq!(
            validate_registration(&form("ada", "engine1", "engine1"), false).unwrap_err(),
            vec![WEAK_PASSWORD.to_string()]
        );
        assert_eq!(
            validate_registration(&form("ada", "enginesss", "enginesss"), false).unwrap_err(),
            vec![WEAK_PASSWORD.to_string()]
        );
        assert_eq!(
            validate_registration(&form("ada", "engine123", "engine124"), false).unwrap_err(),
            vec![PASSWORD_MISMATCH.to_string()]
        );
    }
}
