//! HTML bodies for the two transactional mails the service sends.

/// Body for the verification-code mail. The code expires server-side; the
/// template states the window so users know to retry.
pub fn verification_code(code: &str, expiry_minutes: i64) -> String {
    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Verification code</h2>
  <p>Use the code below to confirm your profile change:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 4px;">{code}</p>
  <p>The code is valid for {expiry_minutes} minutes. If you did not request
  this change you can ignore this email.</p>
</body>
</html>"#
    )
}

/// Body for the forgot-password mail carrying the generated password.
pub fn new_password(password: &str) -> String {
    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>New password</h2>
  <p>Your password has been reset. Sign in with:</p>
  <p style="font-size: 20px; font-weight: bold;">{password}</p>
  <p>Please change it right after signing in.</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_template_embeds_code_and_window() {
        let body = verification_code("A1B2C3", 15);
        assert!(body.contains("A1B2C3"));
        assert!(body.contains("15 minutes"));
    }

    #[test]
    fn password_template_embeds_password() {
        let body = new_password("s3cret");
        assert!(body.contains("s3cret"));
    }
}
