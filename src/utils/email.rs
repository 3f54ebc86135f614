// ============================================================================
// E-MAIL - ENVIO SMTP
// ============================================================================
//
// Descrição:
//   Envio de e-mails transacionais (hoje só a recuperação de senha) via
//   SMTP com lettre. O corpo vai como multipart alternative: HTML + texto
//   puro (tags removidas), para clientes de e-mail sem HTML.
//
// Variáveis de ambiente:
//   - SMTP_HOST, SMTP_PORT (padrão 465), SMTP_USERNAME, SMTP_PASSWORD
//   - SMTP_FROM_NAME, SMTP_FROM_EMAIL
//   - SITE_URL : base do link de recuperação
//
// Pontos de atenção:
//   - O envio tem timeout (30s); nenhuma requisição fica presa no SMTP
//   - Falha de envio vira erro para o chamador; o token já persistido
//     continua válido e uma nova solicitação apaga-e-reemite
//
// ============================================================================

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;
use std::time::Duration;

/// Colaborador externo de e-mail: send(to, subject, body) -> ok|fail.
/// Trait para permitir um stub nos testes sem servidor SMTP.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), String>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Monta o transporte SMTP a partir das variáveis de ambiente
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("SMTP_HOST").map_err(|_| "SMTP_HOST must be set".to_string())?;
        let port: u16 = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(465);
        let username =
            env::var("SMTP_USERNAME").map_err(|_| "SMTP_USERNAME must be set".to_string())?;
        let password =
            env::var("SMTP_PASSWORD").map_err(|_| "SMTP_PASSWORD must be set".to_string())?;
        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Cashback".to_string());
        let from_email =
            env::var("SMTP_FROM_EMAIL").map_err(|_| "SMTP_FROM_EMAIL must be set".to_string())?;

        let from: Mailbox = format!("{} <{}>", from_name, from_email)
            .parse()
            .map_err(|e| format!("Invalid SMTP_FROM_EMAIL: {}", e))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .map_err(|e| format!("Failed to build SMTP transport: {}", e))?
            .port(port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), String> {
        let to: Mailbox = format!("{} <{}>", to_name, to_email)
            .parse()
            .map_err(|e| format!("Invalid recipient address: {}", e))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                strip_tags(html_body),
                html_body.to_string(),
            ))
            .map_err(|e| format!("Failed to build email: {}", e))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| format!("Failed to send email: {}", e))
    }
}

/// Monta o link de recuperação: SITE_URL + token em query string
pub fn build_reset_link(token: &str) -> String {
    let site_url =
        env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    format!("{}/recuperar-senha?token={}", site_url, token)
}

/// Assunto e corpo HTML do e-mail de recuperação de senha
pub fn build_reset_email(nome: &str, reset_link: &str) -> (String, String) {
    let subject = "Recuperação de Senha".to_string();

    let html = format!(
        r#"<h2>Olá, {nome}!</h2>
<p>Recebemos uma solicitação para redefinir a senha da sua conta.</p>
<p>Para criar uma nova senha, clique no botão abaixo. Este link é de uso único e <strong>expira em 2 horas</strong> por motivos de segurança.</p>
<p style="text-align: center; margin: 30px 0;">
    <a href="{reset_link}" style="display: inline-block; background-color: #FF7A00; color: white; padding: 14px 28px; text-decoration: none; border-radius: 30px; font-weight: 600;">Redefinir Minha Senha</a>
</p>
<p>Se você não solicitou esta alteração, pode ignorar este e-mail com segurança. Nenhuma modificação será feita em sua conta.</p>
<p>Atenciosamente,<br><strong>Equipe de Suporte</strong></p>"#
    );

    (subject, html)
}

/// Remove as tags HTML para gerar a versão texto puro do e-mail
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Olá, <strong>Maria</strong>!</p>"), "Olá, Maria!");
        assert_eq!(
            strip_tags(r#"<a href="https://example.com?a=1&b=2">link</a>"#),
            "link"
        );
        assert_eq!(strip_tags("sem tags"), "sem tags");
    }

    #[test]
    fn test_build_reset_email_contains_link_and_expiry() {
        let (subject, html) = build_reset_email("Maria", "https://example.com/r?token=abc");

        assert_eq!(subject, "Recuperação de Senha");
        assert!(html.contains("https://example.com/r?token=abc"));
        assert!(html.contains("Olá, Maria!"));
        assert!(html.contains("expira em 2 horas"));
    }

    #[test]
    fn test_plain_text_fallback_keeps_content() {
        let (_, html) = build_reset_email("Maria", "https://example.com/r?token=abc");
        let text = strip_tags(&html);

        assert!(text.contains("Redefinir Minha Senha"));
        assert!(!text.contains('<'));
    }
}
