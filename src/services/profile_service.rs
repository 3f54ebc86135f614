// ============================================================================
// SERVICE : PERFIL DO USUÁRIO
// ============================================================================
//
// Leitura e atualização do perfil, que atravessa três tabelas:
// usuarios + usuarios_contato + usuarios_endereco (linha principal).
//
// Pontos de atenção:
//   - O update roda em UMA transação: usuário, contato e endereço mudam
//     juntos ou nada muda (rollback completo em qualquer falha)
//   - Contato e endereço são upsert: update se a linha existe, insert se não
//   - Nenhum leitor observa estado parcial do perfil
//
// ============================================================================

use sea_orm::*;

use crate::models::dto::ProfileResponse;
use crate::models::usuarios::{self, Entity as Usuarios};
use crate::models::usuarios_contato::{
    self, Column as ContatoColumn, Entity as UsuariosContato,
};
use crate::models::usuarios_endereco::{
    self, Column as EnderecoColumn, Entity as UsuariosEndereco,
};

/// Campos aceitos pelo PUT /api/profile/update
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
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

pub struct ProfileService;

impl ProfileService {
    /// Busca o perfil completo do usuário. Retorna None se o usuário não
    /// existe; contato/endereço ausentes viram campos null (LEFT JOIN).
    pub async fn fetch_profile(
        db: &DatabaseConnection,
        usuario_id: i32,
    ) -> Result<Option<ProfileResponse>, DbErr> {
        let user = match Usuarios::find_by_id(usuario_id).one(db).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let contato = UsuariosContato::find()
            .filter(ContatoColumn::UsuarioId.eq(usuario_id))
            .one(db)
            .await?;

        let endereco = UsuariosEndereco::find()
            .filter(EnderecoColumn::UsuarioId.eq(usuario_id))
            .filter(EnderecoColumn::Principal.eq(true))
            .one(db)
            .await?;

        Ok(Some(Self::map_profile(user, contato, endereco)))
    }

    /// Mapeamento explícito campo a campo das três tabelas para a resposta
    pub fn map_profile(
        user: usuarios::Model,
        contato: Option<usuarios_contato::Model>,
        endereco: Option<usuarios_endereco::Model>,
    ) -> ProfileResponse {
        ProfileResponse {
            nome: user.nome,
            cpf: user.cpf,
            email: user.email,
            telefone: user.telefone,
            email_alternativo: contato.and_then(|c| c.email_alternativo),
            cep: endereco.as_ref().and_then(|e| e.cep.clone()),
            logradouro: endereco.as_ref().and_then(|e| e.logradouro.clone()),
            numero: endereco.as_ref().and_then(|e| e.numero.clone()),
            complemento: endereco.as_ref().and_then(|e| e.complemento.clone()),
            bairro: endereco.as_ref().and_then(|e| e.bairro.clone()),
            cidade: endereco.as_ref().and_then(|e| e.cidade.clone()),
            estado: endereco.and_then(|e| e.estado),
        }
    }

    /// Atualização atômica do perfil (usuário + contato + endereço principal).
    /// Qualquer erro antes do commit descarta a transação e o SeaORM faz o
    /// rollback; nenhuma escrita parcial fica visível.
    pub async fn update_profile(
        db: &DatabaseConnection,
        usuario_id: i32,
        dados: ProfileUpdate,
    ) -> Result<(), DbErr> {
        let txn = db.begin().await?;

        // 1. Atualizar nome e telefone na tabela usuarios
        let user = Usuarios::find_by_id(usuario_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("usuário não encontrado".to_string()))?;

        let mut user_am: usuarios::ActiveModel = user.into();
        user_am.nome = Set(dados.nome.clone());
        user_am.telefone = Set(dados.telefone.clone());
        user_am.update(&txn).await?;

        // 2. Upsert do contato (e-mail alternativo); no insert o telefone
        //    é duplicado na linha de contato
        let contato = UsuariosContato::find()
            .filter(ContatoColumn::UsuarioId.eq(usuario_id))
            .one(&txn)
            .await?;

        match contato {
            Some(existing) => {
                let mut am: usuarios_contato::ActiveModel = existing.into();
                am.email_alternativo = Set(dados.email_alternativo.clone());
                am.update(&txn).await?;
            }
            None => {
                let am = usuarios_contato::ActiveModel {
                    usuario_id: Set(usuario_id),
                    telefone: Set(dados.telefone.clone()),
                    email_alternativo: Set(dados.email_alternativo.clone()),
                    ..Default::default()
                };
                am.insert(&txn).await?;
            }
        }

        // 3. Upsert do endereço principal
        let endereco = UsuariosEndereco::find()
            .filter(EnderecoColumn::UsuarioId.eq(usuario_id))
            .filter(EnderecoColumn::Principal.eq(true))
            .one(&txn)
            .await?;

        match endereco {
            Some(existing) => {
                let mut am: usuarios_endereco::ActiveModel = existing.into();
                am.cep = Set(dados.cep);
                am.logradouro = Set(dados.logradouro);
                am.numero = Set(dados.numero);
                am.complemento = Set(dados.complemento);
                am.bairro = Set(dados.bairro);
                am.cidade = Set(dados.cidade);
                am.estado = Set(dados.estado);
                am.update(&txn).await?;
            }
            None => {
                let am = usuarios_endereco::ActiveModel {
                    usuario_id: Set(usuario_id),
                    cep: Set(dados.cep),
                    logradouro: Set(dados.logradouro),
                    numero: Set(dados.numero),
                    complemento: Set(dados.complemento),
                    bairro: Set(dados.bairro),
                    cidade: Set(dados.cidade),
                    estado: Set(dados.estado),
                    principal: Set(true),
                    ..Default::default()
                };
                am.insert(&txn).await?;
            }
        }

        // 4. Commit: só aqui as três escritas ficam visíveis
        txn.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn user_row() -> usuarios::Model {
        usuarios::Model {
            id: 9,
            nome: "Maria Silva".to_string(),
            cpf: Some("123.456.789-00".to_string()),
            email: "maria@example.com".to_string(),
            telefone: Some("34999990000".to_string()),
            senha_hash: "$2b$10$segredo".to_string(),
            status: "ativo".to_string(),
            tipo: "cliente".to_string(),
            data_criacao: None,
        }
    }

    fn contato_row() -> usuarios_contato::Model {
        usuarios_contato::Model {
            id: 1,
            usuario_id: 9,
            telefone: Some("34999990000".to_string()),
            email_alternativo: Some("maria.alt@example.com".to_string()),
        }
    }

    fn endereco_row() -> usuarios_endereco::Model {
        usuarios_endereco::Model {
            id: 1,
            usuario_id: 9,
            cep: Some("38400-000".to_string()),
            logradouro: Some("Rua das Flores".to_string()),
            numero: Some("120".to_string()),
            complemento: None,
            bairro: Some("Centro".to_string()),
            cidade: Some("Uberlândia".to_string()),
            estado: Some("MG".to_string()),
            principal: true,
        }
    }

    fn update_payload() -> ProfileUpdate {
        ProfileUpdate {
            nome: "Maria Souza".to_string(),
            telefone: Some("34988887777".to_string()),
            email_alternativo: Some("maria.alt@example.com".to_string()),
            cep: Some("38400-000".to_string()),
            logradouro: Some("Rua das Flores".to_string()),
            numero: Some("120".to_string()),
            complemento: None,
            bairro: Some("Centro".to_string()),
            cidade: Some("Uberlândia".to_string()),
            estado: Some("MG".to_string()),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    // No MySQL cada update do SeaORM consome um exec (UPDATE) e uma query
    // (releitura da linha); as buscas consomem uma query cada.
    #[tokio::test]
    async fn test_update_profile_writes_all_tables_in_one_transaction() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[user_row()], [user_row()]])
            .append_query_results([[contato_row()], [contato_row()]])
            .append_query_results([[endereco_row()], [endereco_row()]])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok()])
            .into_connection();

        let result = ProfileService::update_profile(&db, 9, update_payload()).await;
        assert!(result.is_ok());

        // Usuário, contato e endereço mudaram dentro de UMA transação só
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_update_profile_rolls_back_on_address_failure() {
        // Usuário e contato atualizam, o endereço falha: o erro sobe e a
        // transação é descartada sem commit, desfazendo as escritas
        // anteriores; nenhum leitor observa o perfil pela metade
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([[user_row()], [user_row()]])
            .append_query_results([[contato_row()], [contato_row()]])
            .append_query_results([[endereco_row()]])
            .append_exec_results([exec_ok(), exec_ok()])
            .append_exec_errors([DbErr::Custom("falha simulada no banco".to_string())])
            .into_connection();

        let result = ProfileService::update_profile(&db, 9, update_payload()).await;
        assert!(result.is_err());

        // Tudo que rodou antes da falha ficou dentro da mesma transação
        // abortada; nada foi executado fora dela
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_map_profile_without_contact_and_address() {
        let profile = ProfileService::map_profile(user_row(), None, None);

        assert_eq!(profile.nome, "Maria Silva");
        assert_eq!(profile.email, "maria@example.com");
        assert_eq!(profile.email_alternativo, None);
        assert_eq!(profile.cep, None);
        assert_eq!(profile.cidade, None);
    }

    #[test]
    fn test_map_profile_with_contact_and_address() {
        let profile =
            ProfileService::map_profile(user_row(), Some(contato_row()), Some(endereco_row()));

        assert_eq!(
            profile.email_alternativo,
            Some("maria.alt@example.com".to_string())
        );
        assert_eq!(profile.cep, Some("38400-000".to_string()));
        assert_eq!(profile.estado, Some("MG".to_string()));
    }
}
