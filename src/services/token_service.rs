// ============================================================================
// SERVICE : TOKENS DE RECUPERAÇÃO DE SENHA
// ============================================================================
//
// Máquina de estados por usuário: NONE -> EMITIDO -> {CONSUMIDO, EXPIRADO}.
// EXPIRADO é derivado na validação (now > data_expiracao), nunca gravado.
//
// Pontos de atenção:
//   - No máximo um token vivo por usuário: emitir apaga o anterior
//   - Duas solicitações concorrentes podem intercalar o delete+insert;
//     o efeito final ainda é no máximo um token válido sobrevivendo
//     (não necessariamente o mais recente) - limitação aceita
//   - Consumir o token e trocar a senha acontecem na MESMA transação
//
// ============================================================================

use chrono::{Duration, NaiveDateTime, Utc};
use rand::Rng;
use sea_orm::*;

use crate::models::recuperacao_senha::{
    self, Column as TokenColumn, Entity as RecuperacaoSenha,
};
use crate::models::usuarios;

// Janela de validade do token: 2 horas
const TOKEN_EXPIRATION_HOURS: i64 = 2;

/// Motivos de rejeição de um token no reset de senha
#[derive(Debug, PartialEq)]
pub enum TokenError {
    NotFound,
    AlreadyUsed,
    Expired,
}

impl TokenError {
    /// Mensagem para a resposta 400
    pub fn message(&self) -> &'static str {
        match self {
            TokenError::NotFound => "Token inválido ou não encontrado.",
            TokenError::AlreadyUsed => {
                "Token já utilizado. Por favor, solicite uma nova recuperação."
            }
            TokenError::Expired => "Token expirado. Por favor, solicite uma nova recuperação.",
        }
    }
}

pub struct TokenService;

impl TokenService {
    /// Gera o valor do token: 32 bytes aleatórios (CSPRNG) em hex, 64 chars
    pub fn generate_token_value() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        hex::encode(bytes)
    }

    /// Emite um token novo para o usuário, apagando qualquer token anterior
    /// (invariante: no máximo um token vivo por usuário)
    pub async fn issue_token(
        db: &DatabaseConnection,
        usuario_id: i32,
    ) -> Result<recuperacao_senha::Model, DbErr> {
        // 1. Apagar o token anterior, se existir
        RecuperacaoSenha::delete_many()
            .filter(TokenColumn::UsuarioId.eq(usuario_id))
            .exec(db)
            .await?;

        // 2. Gerar e persistir o token novo
        let now = Utc::now().naive_utc();
        let expires_at = now + Duration::hours(TOKEN_EXPIRATION_HOURS);

        let new_token = recuperacao_senha::ActiveModel {
            usuario_id: Set(usuario_id),
            token: Set(Self::generate_token_value()),
            data_expiracao: Set(expires_at),
            usado: Set(false),
            data_criacao: Set(Some(now)),
            ..Default::default()
        };

        new_token.insert(db).await
    }

    /// Busca a linha do token pelo valor exato
    pub async fn find_token(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<Option<recuperacao_senha::Model>, DbErr> {
        RecuperacaoSenha::find()
            .filter(TokenColumn::Token.eq(token))
            .one(db)
            .await
    }

    /// Valida a linha do token em relação a `now`.
    /// Ordem das verificações: usado antes de expirado (um token consumido
    /// responde "já utilizado" mesmo que também esteja vencido).
    pub fn check_token(
        token: Option<&recuperacao_senha::Model>,
        now: NaiveDateTime,
    ) -> Result<(), TokenError> {
        let token = match token {
            Some(t) => t,
            None => return Err(TokenError::NotFound),
        };

        if token.usado {
            return Err(TokenError::AlreadyUsed);
        }

        if now > token.data_expiracao {
            return Err(TokenError::Expired);
        }

        Ok(())
    }

    /// Consome o token e grava a senha nova em uma única transação:
    /// ou os dois acontecem, ou nenhum. O rollback é automático se a
    /// transação for descartada sem commit.
    pub async fn consume_and_reset_password(
        db: &DatabaseConnection,
        token: recuperacao_senha::Model,
        nova_senha_hash: String,
    ) -> Result<(), DbErr> {
        let txn = db.begin().await?;

        // 1. Trocar a senha do dono do token
        let user = usuarios::Entity::find_by_id(token.usuario_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("usuário do token não existe".to_string()))?;

        let mut user_am: usuarios::ActiveModel = user.into();
        user_am.senha_hash = Set(nova_senha_hash);
        user_am.update(&txn).await?;

        // 2. Marcar o token como usado (false -> true, monotônico)
        let mut token_am: recuperacao_senha::ActiveModel = token.into();
        token_am.usado = Set(true);
        token_am.update(&txn).await?;

        txn.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn token_row(usado: bool, data_expiracao: NaiveDateTime) -> recuperacao_senha::Model {
        recuperacao_senha::Model {
            id: 1,
            usuario_id: 9,
            token: TokenService::generate_token_value(),
            data_expiracao,
            usado,
            data_criacao: None,
        }
    }

    #[test]
    fn test_token_value_is_64_hex_chars() {
        let token = TokenService::generate_token_value();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_values_are_unique() {
        assert_ne!(
            TokenService::generate_token_value(),
            TokenService::generate_token_value()
        );
    }

    #[test]
    fn test_check_token_not_found() {
        let now = Utc::now().naive_utc();
        assert_eq!(TokenService::check_token(None, now), Err(TokenError::NotFound));
    }

    #[test]
    fn test_check_token_valid_within_window() {
        // Emitido agora, expira em 2h: aceito 1h59min depois
        let now = Utc::now().naive_utc();
        let row = token_row(false, now + Duration::hours(TOKEN_EXPIRATION_HOURS));

        let at = now + Duration::minutes(119);
        assert_eq!(TokenService::check_token(Some(&row), at), Ok(()));
    }

    #[test]
    fn test_check_token_rejected_after_expiry() {
        // Rejeitado 2h + 1s depois da emissão
        let now = Utc::now().naive_utc();
        let row = token_row(false, now + Duration::hours(TOKEN_EXPIRATION_HOURS));

        let at = now + Duration::hours(TOKEN_EXPIRATION_HOURS) + Duration::seconds(1);
        assert_eq!(
            TokenService::check_token(Some(&row), at),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_check_token_accepted_at_exact_expiry() {
        // now == data_expiracao ainda vale (a rejeição é estritamente now >)
        let now = Utc::now().naive_utc();
        let row = token_row(false, now);

        assert_eq!(TokenService::check_token(Some(&row), now), Ok(()));
    }

    #[test]
    fn test_check_token_used_wins_over_expired() {
        let now = Utc::now().naive_utc();
        let row = token_row(true, now - Duration::hours(5));

        assert_eq!(
            TokenService::check_token(Some(&row), now),
            Err(TokenError::AlreadyUsed)
        );
    }

    fn user_row() -> usuarios::Model {
        usuarios::Model {
            id: 9,
            nome: "Maria Silva".to_string(),
            cpf: None,
            email: "maria@example.com".to_string(),
            telefone: None,
            senha_hash: "$2b$10$antigo".to_string(),
            status: "ativo".to_string(),
            tipo: "cliente".to_string(),
            data_criacao: None,
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    // No MySQL cada update do SeaORM consome um exec (UPDATE) e uma query
    // (releitura da linha).
    #[tokio::test]
    async fn test_consume_and_reset_runs_in_one_transaction() {
        let now = Utc::now().naive_utc();
        let row = token_row(false, now + Duration::hours(TOKEN_EXPIRATION_HOURS));
        let mut consumed = row.clone();
        consumed.usado = true;

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[user_row()], [user_row()]])
            .append_query_results([[consumed]])
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();

        let result =
            TokenService::consume_and_reset_password(&db, row, "$2b$10$novo".to_string()).await;
        assert!(result.is_ok());

        // Troca de senha e consumo do token dentro de UMA transação só
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_consume_and_reset_fails_as_a_pair() {
        // A senha já foi atualizada dentro da transação quando marcar o
        // token como usado falha: o erro sobe e o descarte da transação
        // desfaz também a troca de senha (ou os dois, ou nenhum)
        let now = Utc::now().naive_utc();
        let row = token_row(false, now + Duration::hours(TOKEN_EXPIRATION_HOURS));

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[user_row()], [user_row()]])
            .append_exec_results([exec_ok()])
            .append_exec_errors([DbErr::Custom("falha simulada no banco".to_string())])
            .into_connection();

        let result =
            TokenService::consume_and_reset_password(&db, row, "$2b$10$novo".to_string()).await;
        assert!(result.is_err());

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_issue_token_deletes_previous_before_insert() {
        // Uma segunda solicitação invalida o token anterior: o DELETE das
        // linhas antigas do usuário roda antes do INSERT do token novo
        let now = Utc::now().naive_utc();
        let inserted = token_row(false, now + Duration::hours(TOKEN_EXPIRATION_HOURS));

        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[inserted.clone()]])
            .append_exec_results([
                // DELETE do token anterior
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                // INSERT do token novo
                MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let result = TokenService::issue_token(&db, 9).await.unwrap();
        assert_eq!(result.usuario_id, 9);

        let log = db.into_transaction_log();
        assert!(format!("{:?}", log[0]).contains("DELETE"));
        assert!(format!("{:?}", log[1]).contains("INSERT"));
    }
}
