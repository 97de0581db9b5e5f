use std::sync::Arc;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::models::{
    organizer::Organizer,
    session::{Claims, IssuedSession, OrganizerSession, ACCESS_TTL_MINUTES, SESSION_AUDIENCE},
};
use crate::domain::ports::{OrganizerRepository, SessionRepository};
use crate::error::AppError;

const REFRESH_TOKEN_LEN: usize = 48;
const CSRF_TOKEN_LEN: usize = 32;

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Organizer sign-in: password accounts, short-lived EdDSA access tokens and
/// rotating refresh tokens grouped into families.
pub struct SessionService {
    organizers: Arc<dyn OrganizerRepository>,
    sessions: Arc<dyn SessionRepository>,
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionService {
    pub fn new(
        organizers: Arc<dyn OrganizerRepository>,
        sessions: Arc<dyn SessionRepository>,
        config: &Config,
    ) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self {
            organizers,
            sessions,
            issuer: config.auth_issuer.clone(),
            encoding_key,
            decoding_key,
        })
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Organizer, AppError> {
        if self.organizers.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))?
            .to_string();

        self.organizers.create(&Organizer::new(username.to_string(), password_hash)).await
    }

    /// Checks the password and opens a new session family.
    pub async fn login(&self, username: &str, password: &str) -> Result<(Organizer, IssuedSession), AppError> {
        let organizer = self.organizers.find_by_username(username).await?
            .ok_or(AppError::Unauthorized)?;

        let stored = PasswordHash::new(&organizer.password_hash)
            .map_err(|e| AppError::InternalWithMsg(format!("Corrupt password hash for {}: {}", organizer.id, e)))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &stored)
            .map_err(|_| AppError::Unauthorized)?;

        let issued = self.mint(&organizer.id, Uuid::new_v4().to_string(), 1).await?;
        info!("Session opened for organizer {}", organizer.id);
        Ok((organizer, issued))
    }

    /// Trades a live refresh token for the next generation of its family.
    /// Presenting a revoked or expired token ends the whole family.
    pub async fn rotate(&self, refresh_token: &str) -> Result<(Organizer, IssuedSession), AppError> {
        let now = Utc::now();
        let token_hash = digest(refresh_token);

        let session = self.sessions.find(&token_hash).await?
            .ok_or(AppError::Unauthorized)?;

        if session.is_revoked() || session.is_expired(now) {
            let revoked = self.sessions.revoke_family(&session.family_id, now).await?;
            warn!(
                family_id = %session.family_id,
                revoked,
                "Stale refresh token presented for organizer {}", session.organizer_id
            );
            return Err(AppError::Unauthorized);
        }

        // Two concurrent rotations of one token: only the first revoke lands.
        if !self.sessions.revoke(&token_hash, now).await? {
            self.sessions.revoke_family(&session.family_id, now).await?;
            return Err(AppError::Unauthorized);
        }

        let organizer = self.organizers.find_by_id(&session.organizer_id).await?
            .ok_or(AppError::Unauthorized)?;

        let issued = self.mint(&organizer.id, session.family_id, session.generation + 1).await?;
        Ok((organizer, issued))
    }

    pub async fn end(&self, refresh_token: &str) -> Result<(), AppError> {
        if let Some(session) = self.sessions.find(&digest(refresh_token)).await? {
            self.sessions.revoke_family(&session.family_id, Utc::now()).await?;
            info!("Session closed for organizer {}", session.organizer_id);
        }
        Ok(())
    }

    pub fn authenticate(&self, access_token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[SESSION_AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);

        decode::<Claims>(access_token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }

    async fn mint(&self, organizer_id: &str, family_id: String, generation: i32) -> Result<IssuedSession, AppError> {
        let now = Utc::now();
        let csrf_token = random_token(CSRF_TOKEN_LEN);

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: organizer_id.to_string(),
            aud: SESSION_AUDIENCE.to_string(),
            exp: (now + Duration::minutes(ACCESS_TTL_MINUTES)).timestamp(),
            iat: now.timestamp(),
            sid: family_id.clone(),
            csrf: csrf_token.clone(),
        };
        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalWithMsg(format!("JWT encoding failed: {}", e)))?;

        let refresh_token = random_token(REFRESH_TOKEN_LEN);
        self.sessions
            .insert(&OrganizerSession::new(digest(&refresh_token), organizer_id.to_string(), family_id, generation))
            .await?;

        Ok(IssuedSession { access_token, refresh_token, csrf_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        organizers: Mutex<Vec<Organizer>>,
        sessions: Mutex<Vec<OrganizerSession>>,
    }

    #[async_trait]
    impl OrganizerRepository for MemoryStore {
        async fn create(&self, organizer: &Organizer) -> Result<Organizer, AppError> {
            self.organizers.lock().unwrap().push(organizer.clone());
            Ok(organizer.clone())
        }
        async fn find_by_username(&self, username: &str) -> Result<Option<Organizer>, AppError> {
            Ok(self.organizers.lock().unwrap().iter().find(|o| o.username == username).cloned())
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<Organizer>, AppError> {
            Ok(self.organizers.lock().unwrap().iter().find(|o| o.id == id).cloned())
        }
    }

    #[async_trait]
    impl SessionRepository for MemoryStore {
        async fn insert(&self, session: &OrganizerSession) -> Result<(), AppError> {
            self.sessions.lock().unwrap().push(session.clone());
            Ok(())
        }
        async fn find(&self, token_hash: &str) -> Result<Option<OrganizerSession>, AppError> {
            Ok(self.sessions.lock().unwrap().iter().find(|s| s.token_hash == token_hash).cloned())
        }
        async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
            let mut sessions = self.sessions.lock().unwrap();
            match sessions.iter_mut().find(|s| s.token_hash == token_hash && s.revoked_at.is_none()) {
                Some(s) => {
                    s.revoked_at = Some(at);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        async fn revoke_family(&self, family_id: &str, at: DateTime<Utc>) -> Result<u64, AppError> {
            let mut count = 0;
            for s in self.sessions.lock().unwrap().iter_mut() {
                if s.family_id == family_id && s.revoked_at.is_none() {
                    s.revoked_at = Some(at);
                    count += 1;
                }
            }
            Ok(count)
        }
    }

    fn service() -> (Arc<MemoryStore>, SessionService) {
        let store = Arc::new(MemoryStore::default());
        let config = Config {
            database_url: "sqlite::memory:".into(),
            port: 0,
            jwt_secret_key: include_str!("../../../tests/keys/test_private.pem").into(),
            jwt_public_key: include_str!("../../../tests/keys/test_public.pem").into(),
            auth_issuer: "unit-issuer".into(),
            log_dir: ".".into(),
        };
        let svc = SessionService::new(store.clone(), store.clone(), &config).unwrap();
        (store, svc)
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_access_token() {
        let (_, svc) = service();
        let organizer = svc.register("owls", "correct-horse").await.unwrap();

        let (_, issued) = svc.login("owls", "correct-horse").await.unwrap();
        let claims = svc.authenticate(&issued.access_token).unwrap();

        assert_eq!(claims.sub, organizer.id);
        assert_eq!(claims.csrf, issued.csrf_token);
        assert!(matches!(svc.login("owls", "wrong").await, Err(AppError::Unauthorized)));
        assert!(matches!(svc.authenticate("garbage"), Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_stored_refresh_token_is_hashed() {
        let (store, svc) = service();
        svc.register("owls", "correct-horse").await.unwrap();
        let (_, issued) = svc.login("owls", "correct-horse").await.unwrap();
        let claims = svc.authenticate(&issued.access_token).unwrap();

        let sessions = store.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].family_id, claims.sid);
        assert_ne!(sessions[0].token_hash, issued.refresh_token);
        assert_eq!(sessions[0].token_hash, digest(&issued.refresh_token));
    }

    #[tokio::test]
    async fn test_replayed_refresh_token_ends_family() {
        let (_, svc) = service();
        svc.register("owls", "correct-horse").await.unwrap();
        let (_, first) = svc.login("owls", "correct-horse").await.unwrap();

        let (_, second) = svc.rotate(&first.refresh_token).await.unwrap();

        assert!(matches!(svc.rotate(&first.refresh_token).await, Err(AppError::Unauthorized)));
        assert!(matches!(svc.rotate(&second.refresh_token).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_expired_refresh_token_is_rejected() {
        let (store, svc) = service();
        svc.register("owls", "correct-horse").await.unwrap();
        let (_, issued) = svc.login("owls", "correct-horse").await.unwrap();

        store.sessions.lock().unwrap()[0].expires_at = Utc::now() - Duration::minutes(1);

        assert!(matches!(svc.rotate(&issued.refresh_token).await, Err(AppError::Unauthorized)));
        assert!(store.sessions.lock().unwrap()[0].is_revoked());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let (_, svc) = service();
        svc.register("owls", "correct-horse").await.unwrap();
        assert!(matches!(svc.register("owls", "other-pass").await, Err(AppError::Conflict(_))));
    }
}
