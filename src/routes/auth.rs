// ============================================================================
// ROTAS : AUTENTICAÇÃO E RECUPERAÇÃO DE SENHA
// ============================================================================
//
// Contrato de status:
//   - /login            : 200 | 400 | 401 | 500
//   - /register         : 201 | 400 | 409 (e-mail duplicado) | 500
//   - /request-password-reset : SEMPRE 200 com mensagem genérica (e-mail
//     existindo ou não), exceto 500 quando o envio do e-mail falha para uma
//     conta existente (assimetria conhecida, mantida)
//   - /reset-password   : 200 | 400 (token inválido/usado/expirado, senha
//     fraca) | 500
//   - /change-password  : 200 | 400 | 401 (senha atual errada) | 404 | 500
//
// Pontos de atenção:
//   - Erros internos (banco, SMTP) são logados com eprintln e NUNCA vão
//     no corpo da resposta
//   - As respostas nunca carregam senha_hash (mapeamento explícito)
//
// ============================================================================

use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use serde::Deserialize;
use validator::ValidateEmail;

use crate::models::dto::UserResponse;
use crate::models::usuarios::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as Usuarios,
};
use crate::middleware::AuthUser;
use crate::services::token_service::{TokenError, TokenService};
use crate::utils::email::{build_reset_email, build_reset_link, EmailSender};
use crate::utils::{jwt, password};

// DTO para o login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

// DTO para o cadastro
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub senha: String,
    pub tipo: Option<String>, // 'cliente' (padrão), 'loja' ou 'admin'
}

// DTO para solicitar a recuperação de senha
#[derive(Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

// DTO para redefinir a senha com o token
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

// DTO para trocar a senha (autenticado)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/login - Autenticar com e-mail e senha (PÚBLICA)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Campos obrigatórios
    if body.email.is_empty() || body.senha.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email e senha são obrigatórios."
        }));
    }

    // 2. Buscar o usuário pelo e-mail (comparação exata)
    let user = match Usuarios::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            // Mesma mensagem do caso "senha errada": não revelar qual dos
            // dois falhou
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Email ou senha incorretos."
            }));
        }
        Err(e) => {
            eprintln!("Erro no login: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    // 3. Verificar a senha
    let is_valid = match password::verify_password(&body.senha, &user.senha_hash) {
        Ok(valid) => valid,
        Err(e) => {
            eprintln!("Erro ao verificar senha: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Email ou senha incorretos."
        }));
    }

    // 4. Emitir o JWT do usuário
    let token = match jwt::generate_token(user.id, &user.email) {
        Ok(token) => token,
        Err(e) => {
            eprintln!("Erro ao gerar token: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    // 5. Resposta sem o hash da senha
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Login bem-sucedido!",
        "user": UserResponse {
            id: user.id,
            nome: user.nome,
            email: user.email,
            tipo: user.tipo,
        },
        "token": token
    }))
}

/// POST /api/register - Criar uma conta (PÚBLICA)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Campos obrigatórios
    if body.nome.is_empty() || body.email.is_empty() || body.telefone.is_empty()
        || body.senha.is_empty()
    {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Todos os campos obrigatórios devem ser preenchidos."
        }));
    }

    // 2. Formato do e-mail
    if !body.email.validate_email() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Formato de e-mail inválido."
        }));
    }

    // 3. Política de senha (a mesma do reset e da troca de senha)
    if let Err(message) = password::validate_password_strength(&body.senha) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "message": message }));
    }

    // 4. E-mail já cadastrado?
    match Usuarios::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "message": "Este e-mail já está cadastrado."
            }));
        }
        Err(e) => {
            eprintln!("Erro no registro: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
        _ => {}
    }

    // 5. Hash da senha (nunca gravar em claro)
    let senha_hash = match password::hash_password(&body.senha) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("Erro ao gerar hash de senha: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    // 6. Inserir o usuário
    let new_user = UserActiveModel {
        nome: Set(body.nome.clone()),
        email: Set(body.email.clone()),
        telefone: Set(Some(body.telefone.clone())),
        senha_hash: Set(senha_hash),
        status: Set("ativo".to_string()),
        tipo: Set(body.tipo.clone().unwrap_or_else(|| "cliente".to_string())),
        data_criacao: Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    };

    match new_user.insert(db.get_ref()).await {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "message": "Usuário registrado com sucesso!"
        })),
        // A UNIQUE constraint do banco é a palavra final contra a corrida
        // do check-then-insert entre duas requisições simultâneas
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            HttpResponse::Conflict().json(serde_json::json!({
                "message": "Este e-mail já está cadastrado."
            }))
        }
        Err(e) => {
            eprintln!("Erro ao registrar usuário: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }))
        }
    }
}

/// POST /api/request-password-reset - Solicitar recuperação de senha (PÚBLICA)
///
/// Resposta genérica idêntica com o e-mail cadastrado ou não, para não
/// permitir enumeração de contas.
#[post("/request-password-reset")]
pub async fn request_password_reset(
    body: web::Json<RequestResetRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<dyn EmailSender>,
) -> HttpResponse {
    const GENERIC_MESSAGE: &str = "Se o e-mail estiver cadastrado, as instruções foram enviadas.";

    // 1. Campo obrigatório
    if body.email.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email é obrigatório."
        }));
    }

    // 2. Buscar o usuário; ausente -> mesma resposta genérica, sem mais nada
    let user = match Usuarios::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Ok().json(serde_json::json!({ "message": GENERIC_MESSAGE }));
        }
        Err(e) => {
            eprintln!("Erro ao solicitar recuperação de senha: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    // 3. Emitir o token (apaga o anterior; no máximo um vivo por usuário)
    let token = match TokenService::issue_token(db.get_ref(), user.id).await {
        Ok(token) => token,
        Err(e) => {
            eprintln!("Erro ao emitir token de recuperação: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    // 4. Enviar o e-mail com o link de recuperação. Se o envio falhar, o
    //    token persistido continua válido e uma nova solicitação
    //    apaga-e-reemite; aqui respondemos 500
    let reset_link = build_reset_link(&token.token);
    let (subject, html) = build_reset_email(&user.nome, &reset_link);

    if let Err(e) = mailer.send(&user.email, &user.nome, &subject, &html).await {
        eprintln!("Erro ao enviar e-mail de recuperação: {}", e);
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "message": "Falha ao enviar e-mail. Por favor, tente novamente."
        }));
    }

    // 5. Mesma resposta genérica do caso "e-mail não cadastrado"
    HttpResponse::Ok().json(serde_json::json!({ "message": GENERIC_MESSAGE }))
}

/// POST /api/reset-password - Redefinir a senha com o token (PÚBLICA)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Campos obrigatórios
    if body.token.is_empty() || body.new_password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Token e nova senha são obrigatórios."
        }));
    }

    // 2. Política de senha
    if let Err(message) = password::validate_password_strength(&body.new_password) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "message": message }));
    }

    // 3. Buscar a linha do token e validar: existe, não usado, não expirado
    let token_row = match TokenService::find_token(db.get_ref(), &body.token).await {
        Ok(row) => row,
        Err(e) => {
            eprintln!("Erro ao buscar token de recuperação: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    let now = Utc::now().naive_utc();
    let token_row = match token_row {
        Some(row) => row,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": TokenError::NotFound.message()
            }));
        }
    };

    if let Err(reason) = TokenService::check_token(Some(&token_row), now) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": reason.message()
        }));
    }

    // 4. Hash da senha nova
    let senha_hash = match password::hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("Erro ao gerar hash de senha: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    // 5. Trocar a senha e consumir o token na mesma transação
    match TokenService::consume_and_reset_password(db.get_ref(), token_row, senha_hash).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Senha redefinida com sucesso!"
        })),
        Err(e) => {
            eprintln!("Erro ao redefinir senha: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }))
        }
    }
}

/// POST /api/change-password - Trocar a própria senha (PROTEGIDA)
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Campos obrigatórios
    if body.current_password.is_empty() || body.new_password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Senha atual e nova senha são obrigatórias."
        }));
    }

    // 2. Política de senha para a senha nova
    if let Err(message) = password::validate_password_strength(&body.new_password) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "message": message }));
    }

    // 3. Buscar o usuário autenticado
    let user = match Usuarios::find_by_id(auth_user.usuario_id).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Usuário não encontrado."
            }));
        }
        Err(e) => {
            eprintln!("Erro ao alterar senha: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    // 4. Conferir a senha atual
    let is_valid = match password::verify_password(&body.current_password, &user.senha_hash) {
        Ok(valid) => valid,
        Err(e) => {
            eprintln!("Erro ao verificar senha: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Senha atual incorreta."
        }));
    }

    // 5. Gravar a senha nova
    let senha_hash = match password::hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("Erro ao gerar hash de senha: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }));
        }
    };

    let mut user_am: UserActiveModel = user.into();
    user_am.senha_hash = Set(senha_hash);

    match user_am.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Senha alterada com sucesso!"
        })),
        Err(e) => {
            eprintln!("Erro ao alterar senha: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erro interno do servidor."
            }))
        }
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(register)
        .service(request_password_reset)
        .service(reset_password)
        .service(change_password);
}
