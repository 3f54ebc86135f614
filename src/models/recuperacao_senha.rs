// ============================================================================
// MODELO : RECUPERAÇÃO DE SENHA
// ============================================================================
//
// Descrição:
//   Modelo da tabela recuperacao_senha, que guarda os tokens de uso único
//   do fluxo "esqueci minha senha".
//
// Colunas da tabela recuperacao_senha:
//   - id (INTEGER, PRIMARY KEY, AUTO_INCREMENT)
//   - usuario_id (INTEGER, NOT NULL, FK para usuarios)
//   - token (VARCHAR(64), UNIQUE, NOT NULL) - 32 bytes aleatórios em hex
//   - data_expiracao (TIMESTAMP, NOT NULL) - data_criacao + 2 horas
//   - usado (BOOLEAN, DEFAULT FALSE, NOT NULL)
//   - data_criacao (TIMESTAMP, DEFAULT CURRENT_TIMESTAMP)
//
// Workflow:
//   1. Usuário pede o reset via POST /api/request-password-reset
//   2. Backend apaga qualquer token anterior do usuário (no máximo um vivo)
//   3. Backend gera 32 bytes aleatórios, codifica em hex e insere aqui
//   4. Backend envia e-mail com o link contendo o token
//   5. Usuário clica no link e envia POST /api/reset-password
//   6. Backend verifica: token existe, não usado, não expirado
//   7. Backend troca a senha e marca usado = true NA MESMA transação
//
// Pontos de atenção:
//   - Um token só pode ser usado uma vez (usado = true é definitivo)
//   - Expiração é derivada na validação (now > data_expiracao), nunca gravada
//   - Linhas usadas/expiradas ficam como trilha de auditoria (sem sweeper)
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recuperacao_senha")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub usuario_id: i32,

    #[sea_orm(unique)]
    pub token: String,

    pub data_expiracao: DateTime,

    pub usado: bool,

    pub data_criacao: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::usuarios::Entity",
        from = "Column::UsuarioId",
        to = "super::usuarios::Column::Id"
    )]
    Usuario,
}

impl Related<super::usuarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuario.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
