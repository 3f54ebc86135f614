use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub cpf: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub telefone: Option<String>,
    #[serde(skip_serializing)] // Nunca expor o hash da senha em JSON
    pub senha_hash: String,
    pub status: String, // 'ativo' ou 'inativo'
    pub tipo: String,   // 'cliente', 'loja' ou 'admin'
    pub data_criacao: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recuperacao_senha::Entity")]
    RecuperacaoSenha,

    #[sea_orm(has_one = "super::usuarios_contato::Entity")]
    Contato,

    #[sea_orm(has_many = "super::usuarios_endereco::Entity")]
    Endereco,

    #[sea_orm(has_many = "super::cashback_saldos::Entity")]
    CashbackSaldos,

    #[sea_orm(has_many = "super::transacoes_cashback::Entity")]
    TransacoesCashback,
}

impl Related<super::recuperacao_senha::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecuperacaoSenha.def()
    }
}

impl Related<super::usuarios_contato::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contato.def()
    }
}

impl Related<super::usuarios_endereco::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Endereco.def()
    }
}

impl Related<super::cashback_saldos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashbackSaldos.def()
    }
}

impl Related<super::transacoes_cashback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransacoesCashback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
