use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::middleware::AuthUser;
use crate::services::cashback_service::CashbackService;

// Paginação do histórico: padrão 5 itens a partir do início.
// Nenhum teto é aplicado aqui (limitado na borda, se preciso).
#[derive(Deserialize)]
pub struct PaginationParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize)]
pub struct StoreParams {
    pub limit: Option<u64>,
}

/// GET /api/transactions - Histórico de transações de cashback (PROTEGIDA)
#[get("/transactions")]
pub async fn transactions(
    auth_user: AuthUser,
    query: web::Query<PaginationParams>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(5);
    let offset = query.offset.unwrap_or(0);

    match CashbackService::list_transactions(db.get_ref(), auth_user.usuario_id, limit, offset)
        .await
    {
        Ok(transactions) => {
            HttpResponse::Ok().json(serde_json::json!({ "transactions": transactions }))
        }
        Err(e) => {
            eprintln!("Erro ao buscar histórico de transações: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor ao buscar histórico de transações."
            }))
        }
    }
}

/// GET /api/user-balance - Saldo agregado do usuário (PROTEGIDA)
#[get("/user-balance")]
pub async fn user_balance(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match CashbackService::get_balance(db.get_ref(), auth_user.usuario_id).await {
        Ok(balance) => HttpResponse::Ok().json(serde_json::json!({ "balance": balance })),
        Err(e) => {
            eprintln!("Erro ao buscar saldo do usuário: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor ao buscar saldo."
            }))
        }
    }
}

/// GET /api/popular-stores - Lojas parceiras aprovadas (PROTEGIDA)
#[get("/popular-stores")]
pub async fn popular_stores(
    _auth_user: AuthUser,
    query: web::Query<StoreParams>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(5);

    match CashbackService::popular_stores(db.get_ref(), limit).await {
        Ok(stores) => HttpResponse::Ok().json(serde_json::json!({ "stores": stores })),
        Err(e) => {
            eprintln!("Erro ao buscar lojas populares: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor ao buscar lojas."
            }))
        }
    }
}

pub fn cashback_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(transactions)
        .service(user_balance)
        .service(popular_stores);
}
