use crate::error::{AppError, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<()> {
    if verify(password, password_hash)? {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Invalid credentials".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hashed = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &hashed).is_ok());
        assert!(verify_password("wrong-password", &hashed).is_err());
    }
}
