//! Authentication test helpers
//!
//! Provides utilities for creating test profiles, generating tokens,
//! and testing authentication flows.

use sqlx::PgPool;
use uuid::Uuid;

use interphone::backend::auth::sessions::create_token;
use interphone::backend::auth::users::{create_profile, NewProfile};
use interphone::shared::directory::Profile;
use interphone::shared::AppConfig;

/// Test profile credentials
pub struct TestUser {
    pub profile: Profile,
    pub password: String,
    pub token: String,
}

/// Signing secret of the default configuration
pub fn test_secret() -> String {
    AppConfig::default().jwt_secret
}

/// Create a test profile in the database
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<TestUser, Box<dyn std::error::Error>> {
    // Low cost keeps the suite fast
    let password_hash = bcrypt::hash(password, 4)?;

    let row = create_profile(
        pool,
        NewProfile {
            email: email.to_string(),
            password_hash,
            first_name: "Claire".to_string(),
            last_name: "Martin".to_string(),
            phone: Some("0601020304".to_string()),
        },
    )
    .await?;

    let profile = row.into_profile();
    let token = generate_test_token(profile.id, &profile.email);

    Ok(TestUser {
        profile,
        password: password.to_string(),
        token,
    })
}

/// Create a test profile with a unique email
pub async fn create_unique_test_user(pool: &PgPool) -> Result<TestUser, Box<dyn std::error::Error>> {
    let email = format!("test_{}@example.fr", Uuid::new_v4().simple());
    create_test_user(pool, &email, "motdepasse1").await
}

/// Generate a test JWT token signed with the default secret
pub fn generate_test_token(profile_id: Uuid, email: &str) -> String {
    create_token(&test_secret(), profile_id, email.to_string(), false)
        .expect("Failed to generate test token")
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
