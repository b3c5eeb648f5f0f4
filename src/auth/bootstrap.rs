use crate::{config::AuthConfig, db::entities::role, services::ServiceContext};

use super::{Role, password::hash_password};

/// Permission sets installed for a fresh database. Admin holds the universal
/// wildcard; the other two mirror the HEMIS defaults.
const DEFAULT_ROLES: &[(&str, &[&str])] = &[
    ("admin", &["*"]),
    (
        "staff",
        &["student.*", "employee.view", "group.*", "report.*"],
    ),
    ("student", &["student.self", "schedule.view", "grade.self"]),
];

pub async fn seed_roles(services: &ServiceContext) -> anyhow::Result<Vec<role::Model>> {
    let role_dao = services.roles();
    let mut seeded = Vec::with_capacity(DEFAULT_ROLES.len());

    for (name, permissions) in DEFAULT_ROLES {
        let existing = role_dao
            .find_by_name(name)
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        let role = match existing {
            Some(role) => role,
            None => {
                let role = role_dao
                    .create_role(name, permissions)
                    .await
                    .map_err(|err| anyhow::anyhow!("{err}"))?;
                tracing::info!("seeded role {}", role.name);
                role
            }
        };
        seeded.push(role);
    }

    Ok(seeded)
}

pub async fn seed_admin(cfg: &AuthConfig, services: &ServiceContext) -> anyhow::Result<()> {
    let user_dao = services.users();

    if let Some(existing) = user_dao
        .find_by_email(&cfg.admin_email)
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?
    {
        tracing::info!("admin user already present: {}", existing.email);
        return Ok(());
    }

    let admin_role = services
        .roles()
        .find_by_name(Role::Admin.as_str())
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?
        .ok_or_else(|| anyhow::anyhow!("admin role missing; seed roles first"))?;

    let hash = hash_password(&cfg.admin_password)
        .map_err(|e| anyhow::anyhow!("admin seed hash error: {e}"))?;
    let user = user_dao
        .create_user(&cfg.admin_email, &hash, &admin_role.id)
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    tracing::info!("seeded admin user {}", user.email);
    Ok(())
}

pub async fn init_defaults(cfg: &AuthConfig, services: &ServiceContext) -> anyhow::Result<()> {
    seed_roles(services).await?;
    seed_admin(cfg, services).await
}
