// src/middleware/rbac.rs

// Autorização centralizada: TODA checagem de papel mora aqui. Handler de
// mutação declara a sua capability na assinatura via RequireCapability<T>;
// nada de comparação de papel espalhada pelo código.

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    models::{
        auth::{User, UserRole},
        project::Project,
    },
};

/// 1. O Trait que define o que é uma Capability
pub trait CapabilityDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// A tabela única papel -> capability.
pub fn role_allows(role: UserRole, capability: &str) -> bool {
    match role {
        UserRole::Admin => true,
        UserRole::Staff => matches!(
            capability,
            "projects:write"
                | "projects:confirm"
                | "timeline:write"
                | "inventory:write"
                | "inventory:transfer"
                | "payments:write"
                | "reports:export"
        ),
        UserRole::Client => matches!(capability, "projects:write"),
    }
}

/// Escopo de leitura: cliente só enxerga a própria obra; staff/admin veem
/// todas. Usado pelos handlers de consulta.
pub fn ensure_can_view(user: &User, project: &Project) -> Result<(), AppError> {
    if user.role == UserRole::Client && project.client_id != user.id {
        return Err(AppError::Forbidden(
            "Você só pode acessar a própria obra.".to_string(),
        ));
    }
    Ok(())
}

/// 2. O Extractor (Guardião)
pub struct RequireCapability<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai Usuário (pendurado pelo auth_guard)
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        // B. Consulta a tabela de capabilities
        let required = T::slug();
        if !role_allows(user.role, required) {
            return Err(AppError::Forbidden(format!(
                "Você precisa da permissão '{required}' para realizar esta ação."
            )));
        }

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPABILITIES (TIPOS)
// ---

pub struct CapProjectsWrite;
impl CapabilityDef for CapProjectsWrite {
    fn slug() -> &'static str {
        "projects:write"
    }
}

pub struct CapProjectsConfirm;
impl CapabilityDef for CapProjectsConfirm {
    fn slug() -> &'static str {
        "projects:confirm"
    }
}

pub struct CapTimelineWrite;
impl CapabilityDef for CapTimelineWrite {
    fn slug() -> &'static str {
        "timeline:write"
    }
}

pub struct CapInventoryWrite;
impl CapabilityDef for CapInventoryWrite {
    fn slug() -> &'static str {
        "inventory:write"
    }
}

pub struct CapInventoryTransfer;
impl CapabilityDef for CapInventoryTransfer {
    fn slug() -> &'static str {
        "inventory:transfer"
    }
}

pub struct CapPaymentsWrite;
impl CapabilityDef for CapPaymentsWrite {
    fn slug() -> &'static str {
        "payments:write"
    }
}

pub struct CapReportsExport;
impl CapabilityDef for CapReportsExport {
    fn slug() -> &'static str {
        "reports:export"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_pode_tudo() {
        for cap in [
            "projects:write",
            "projects:confirm",
            "inventory:transfer",
            "payments:write",
            "reports:export",
        ] {
            assert!(role_allows(UserRole::Admin, cap));
        }
    }

    #[test]
    fn staff_opera_mas_nao_e_admin_magico() {
        assert!(role_allows(UserRole::Staff, "inventory:transfer"));
        assert!(role_allows(UserRole::Staff, "projects:confirm"));
        assert!(!role_allows(UserRole::Staff, "capability:desconhecida"));
    }

    #[test]
    fn cliente_so_abre_obra() {
        assert!(role_allows(UserRole::Client, "projects:write"));
        assert!(!role_allows(UserRole::Client, "projects:confirm"));
        assert!(!role_allows(UserRole::Client, "inventory:transfer"));
        assert!(!role_allows(UserRole::Client, "payments:write"));
        assert!(!role_allows(UserRole::Client, "reports:export"));
    }
}
