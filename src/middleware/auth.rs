use actix_web::{dev::Payload, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// Estrutura com as informações do usuário autenticado.
/// Usada como extractor nas rotas protegidas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub usuario_id: i32,
    pub email: String,
}

/// Implementação de FromRequest para AuthUser.
/// O Actix-Web extrai o AuthUser automaticamente em cada rota protegida.
///
/// Contrato de status:
///   - Header Authorization ausente ou fora do formato Bearer -> 401
///   - Header presente mas token inválido/expirado -> 403
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extrair o header Authorization
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "message": "Token de autenticação ausente."
                }));
                return ready(Err(actix_web::error::InternalError::from_response(
                    "",
                    response,
                ).into()));
            }
        };

        // 2. Converter o header em string
        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "message": "Header Authorization inválido."
                }));
                return ready(Err(actix_web::error::InternalError::from_response(
                    "",
                    response,
                ).into()));
            }
        };

        // 3. Extrair o token (formato: "Bearer <token>")
        let token = if auth_str.starts_with("Bearer ") {
            &auth_str[7..]
        } else {
            let response = HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Formato de autenticação inválido (esperado: Bearer <token>)."
            }));
            return ready(Err(actix_web::error::InternalError::from_response(
                "",
                response,
            ).into()));
        };

        // 4. Verificar o token JWT. Token presente mas não reconhecido -> 403
        let claims = match jwt::verify_token(token) {
            Ok(claims) => claims,
            Err(_) => {
                let response = HttpResponse::Forbidden().json(serde_json::json!({
                    "message": "Token de autenticação inválido ou expirado."
                }));
                return ready(Err(actix_web::error::InternalError::from_response(
                    "",
                    response,
                ).into()));
            }
        };

        // 5. Criar e retornar o AuthUser
        ready(Ok(AuthUser {
            usuario_id: claims.sub,
            email: claims.email,
        }))
    }
}
