// ============================================================================
// MODELS - MÓDULO PRINCIPAL
// ============================================================================
//
// Descrição:
//   Ponto de entrada para todos os modelos de dados.
//   Cada modelo corresponde a uma tabela MySQL com SeaORM.
//
// Lista dos módulos:
//   - health : Health check da API
//   - usuarios : Usuários (cliente, loja, admin)
//   - recuperacao_senha : Tokens de recuperação de senha (expiram em 2h)
//   - usuarios_contato : Contato secundário do usuário (e-mail alternativo)
//   - usuarios_endereco : Endereços do usuário (flag principal)
//   - lojas : Lojas parceiras
//   - cashback_saldos : Saldo de cashback por (usuário, loja)
//   - transacoes_cashback : Transações de cashback
//   - transacoes_saldo_usado : Saldo pré-existente usado em uma transação
//   - dto : Data Transfer Objects para as respostas da API
//
// Pontos de atenção:
//   - Todos os modelos usam SeaORM (sem SQL bruto)
//   - As relações entre tabelas são definidas em cada modelo
//   - Valores monetários são Decimal (rust_decimal), nunca float no banco
//
// ============================================================================

pub mod health;
pub mod usuarios;
pub mod recuperacao_senha;
pub mod usuarios_contato;
pub mod usuarios_endereco;
pub mod lojas;
pub mod cashback_saldos;
pub mod transacoes_cashback;
pub mod transacoes_saldo_usado;
pub mod dto;
