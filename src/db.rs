// conexão com o banco

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

pub async fn establish_connection() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in .env file");

    // Todo acesso ao banco tem timeout: nenhuma requisição fica esperando
    // conexão ou I/O indefinidamente. Isolamento: o padrão do MySQL
    // (REPEATABLE READ), sem locking explícito.
    let mut opts = ConnectOptions::new(database_url);
    opts.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300));

    Database::connect(opts).await
}
