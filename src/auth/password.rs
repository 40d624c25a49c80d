use super::AuthError;

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare a password with a stored bcrypt hash.
///
/// A mismatch is `Ok(false)`; an error means the stored hash is unusable.
pub fn verify_password(hash: &str, password: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a login handle against `^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$`.
pub fn validate_email_format(email: &str) -> Result<(), String> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("email does not match email format".to_string());
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));

    // The domain is greedy in the pattern, so the TLD is whatever follows the last dot.
    let domain_ok = match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && host
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
                && tld.len() >= 2
                && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    };

    if local_ok && domain_ok {
        Ok(())
    } else {
        Err("email does not match email format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw", 4).unwrap();
        assert_ne!(hash, "pw");
        assert!(verify_password(&hash, "pw").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("pw", 4).unwrap();
        let b = hash_password("pw", 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_is_error() {
        assert!(verify_password("not-a-bcrypt-hash", "pw").is_err());
    }

    #[test]
    fn test_email_format() {
        for ok in ["a@b.com", "first.last+tag@mail.example.org", "x_y%z@sub-domain.io"] {
            assert!(validate_email_format(ok).is_ok(), "{ok}");
        }
        for bad in ["", "plain", "@b.com", "a@b", "a@b.c", "a@.com1", "a b@c.com", "a@b@c.com", "a@b.c0m"] {
            assert!(validate_email_format(bad).is_err(), "{bad}");
        }
    }
}
