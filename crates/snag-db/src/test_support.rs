//! Shared test utilities for snag-db repo tests.

#[cfg(test)]
pub(crate) mod helpers {
    use snag_core::entities::{Defect, Project, Site, User};
    use snag_core::enums::Role;

    use crate::SnagDb;
    use crate::service::SnagService;

    /// Create an in-memory `SnagService`.
    pub async fn test_service() -> SnagService {
        let db = SnagDb::open_local(":memory:").await.unwrap();
        SnagService::from_db(db)
    }

    /// Seed a user with a throwaway password hash.
    pub async fn seed_user(svc: &SnagService, email: &str, role: Role) -> User {
        svc.create_user(email, None, "$argon2id$test", role)
            .await
            .unwrap()
    }

    /// Seed a project and one site under it.
    pub async fn seed_project_site(svc: &SnagService) -> (Project, Site) {
        let project = svc.create_project("Harbor Towers").await.unwrap();
        let site = svc.create_site(&project.id, "Block A").await.unwrap();
        (project, site)
    }

    /// Seed a defect on `site_id` created by `creator_id`, defaults otherwise.
    pub async fn seed_defect(svc: &SnagService, site_id: &str, creator_id: &str) -> Defect {
        svc.create_defect(crate::repos::defect::NewDefect {
            site_id: site_id.to_string(),
            title: "Cracked slab".to_string(),
            description: None,
            priority: None,
            assignee_id: None,
            deadline: None,
            creator_id: creator_id.to_string(),
        })
        .await
        .unwrap()
    }
}
