// Custo 10 para ficar compatível com os hashes já gravados no banco.
// bcrypt::verify aceita qualquer custo embutido no próprio hash.
const BCRYPT_COST: u32 = 10;

/// Hash de uma senha com bcrypt (custo 10).
/// O salt é gerado pelo próprio bcrypt; nunca gravamos a senha em claro.
pub fn hash_password(password: &str) -> Result<String, String> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| format!("Failed to hash password: {}", e))
}

/// Verifica uma senha contra o hash gravado.
/// A comparação em tempo constante fica a cargo do bcrypt.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    bcrypt::verify(password, stored_hash)
        .map_err(|e| format!("Password verification error: {}", e))
}

/// Política de senha, idêntica no cadastro, no reset e na troca de senha:
/// mínimo 8 caracteres, pelo menos uma maiúscula, uma minúscula e um dígito.
/// Retorna a mensagem de erro pronta para a resposta 400.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("A senha deve ter no mínimo 8 caracteres.".to_string());
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_lowercase || !has_uppercase || !has_digit {
        return Err(
            "A senha deve conter pelo menos uma letra maiúscula, uma minúscula e um número."
                .to_string(),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("GoodPass1").unwrap();

        assert!(hash.starts_with("$2"));
        assert_ne!(hash, "GoodPass1");
        assert!(verify_password("GoodPass1", &hash).unwrap());
        assert!(!verify_password("WrongPass1", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let h1 = hash_password("GoodPass1").unwrap();
        let h2 = hash_password("GoodPass1").unwrap();

        assert_ne!(h1, h2);
    }

    #[test]
    fn test_password_policy_rejects_short() {
        // 7 caracteres, mesmo com maiúscula e dígito
        assert!(validate_password_strength("short1A").is_err());
    }

    #[test]
    fn test_password_policy_rejects_missing_classes() {
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("SemNumeros").is_err());
    }

    #[test]
    fn test_password_policy_accepts_valid() {
        assert!(validate_password_strength("GoodPass1").is_ok());
    }
}
