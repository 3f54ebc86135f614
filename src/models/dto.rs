// Respostas estruturadas da API. Mapeamento explícito campo a campo: nada de
// espalhar a linha do banco na resposta, para nenhuma coluna interna
// (senha_hash, valor_cashback bruto) vazar por acidente.
use serde::Serialize;
use chrono::NaiveDateTime;

// Usuário retornado no login (sem hash de senha)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub tipo: String,
}

// Perfil completo: usuário + contato + endereço principal (LEFT JOIN, campos
// ausentes viram null)
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub nome: String,
    pub cpf: Option<String>,
    pub email: String,
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

// 1 item do histórico de transações
#[derive(Debug, Serialize)]
pub struct TransactionItem {
    pub id: i32,
    pub valor_total: f64,
    // Sempre o valor_cliente da transação, nunca o cashback bruto
    pub valor_cashback: f64,
    pub valor_usado: f64,
    pub data_transacao: NaiveDateTime,
    pub status: String,
    pub loja_nome: String,
}

// Saldo agregado entre todas as lojas do usuário
#[derive(Debug, Serialize)]
pub struct BalanceData {
    pub saldo_disponivel: f64,
    pub total_creditado: f64,
    pub total_usado: f64,
    pub saldo_pendente: f64,
}

// 1 loja parceira na listagem de lojas populares
#[derive(Debug, Serialize)]
pub struct StoreItem {
    pub id: i32,
    pub nome_fantasia: String,
    pub porcentagem_cashback: f64,
    pub logo: Option<String>,
}
