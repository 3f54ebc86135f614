use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Saldo agregado de cashback por par (usuário, loja). O saldo pendente NÃO
// fica aqui: ele é derivado das transações com status 'pendente' a cada
// leitura.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cashback_saldos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub usuario_id: i32,
    pub loja_id: i32,
    pub saldo_disponivel: Decimal,
    pub total_creditado: Decimal,
    pub total_usado: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::usuarios::Entity",
        from = "Column::UsuarioId",
        to = "super::usuarios::Column::Id"
    )]
    Usuario,

    #[sea_orm(
        belongs_to = "super::lojas::Entity",
        from = "Column::LojaId",
        to = "super::lojas::Column::Id"
    )]
    Loja,
}

impl Related<super::usuarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuario.def()
    }
}

impl Related<super::lojas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loja.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
