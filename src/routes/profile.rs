use actix_web::{get, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use validator::ValidateEmail;

use crate::middleware::AuthUser;
use crate::services::profile_service::{ProfileService, ProfileUpdate};

// DTO para o PUT /api/profile/update
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub nome: String,
    pub telefone: Option<String>,
    pub email_alternativo: Option<String>,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
}

/// GET /api/profile - Perfil completo do usuário autenticado (PROTEGIDA)
#[get("/profile")]
pub async fn get_profile(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match ProfileService::fetch_profile(db.get_ref(), auth_user.usuario_id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(serde_json::json!({ "user": profile })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Usuário não encontrado."
        })),
        Err(e) => {
            eprintln!("Erro ao buscar perfil: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }))
        }
    }
}

/// PUT /api/profile/update - Atualizar o perfil (PROTEGIDA)
///
/// As três tabelas (usuarios, usuarios_contato, usuarios_endereco) mudam em
/// uma única transação; qualquer falha desfaz tudo.
#[put("/profile/update")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Validações de entrada
    if body.nome.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Nome é obrigatório."
        }));
    }

    if let Some(ref email_alternativo) = body.email_alternativo {
        if !email_alternativo.is_empty() && !email_alternativo.validate_email() {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Formato de e-mail inválido."
            }));
        }
    }

    // 2. Aplicar a transação
    let dados = ProfileUpdate {
        nome: body.nome.clone(),
        telefone: body.telefone.clone(),
        email_alternativo: body.email_alternativo.clone(),
        cep: body.cep.clone(),
        logradouro: body.logradouro.clone(),
        numero: body.numero.clone(),
        complemento: body.complemento.clone(),
        bairro: body.bairro.clone(),
        cidade: body.cidade.clone(),
        estado: body.estado.clone(),
    };

    match ProfileService::update_profile(db.get_ref(), auth_user.usuario_id, dados).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Perfil atualizado com sucesso!"
        })),
        Err(e) => {
            eprintln!("Erro ao atualizar perfil: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor ao atualizar perfil."
            }))
        }
    }
}

pub fn profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_profile).service(update_profile);
}
