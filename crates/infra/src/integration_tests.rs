//! Integration tests for the directory over a full store.
//!
//! Tests: Directory → RecordStore / IdentityRegistry / ProjectGraph
//!
//! Verifies:
//! - Record groups share one identity key and each enforces its own uniqueness
//! - Aggregated views treat missing groups as absent, not as errors
//! - Project edges only reference personal records, in both listing modes
//!
//! The Postgres tests run only when `DATABASE_URL` is set.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use workforce_auth::{AdminAccount, AdminCredentials, Credentials, Secret};
    use workforce_core::{ConflictField, DomainError, EmploymentCode, RecordGroup};
    use workforce_employees::{FinanceRecord, PersonalRecord, ProfessionalRecord};
    use workforce_projects::{MemberFetch, NewProject, ProjectStatus};

    use crate::directory::EmployeeDirectory;
    use crate::login::{AdminLogin, EmployeeLogin};
    use crate::store::{IdentityRegistry, InMemoryWorkforceStore, PostgresWorkforceStore};

    fn code(raw: &str) -> EmploymentCode {
        EmploymentCode::parse(raw).unwrap()
    }

    fn credentials(email: &str, secret: &str) -> Credentials {
        Credentials {
            login_email: email.to_string(),
            secret: Secret::new(secret),
        }
    }

    async fn seed_personal(directory: &EmployeeDirectory, raw: &str, name: &str) {
        directory
            .create_personal(PersonalRecord::new(code(raw), name))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn personal_record_round_trips() {
        let directory = EmployeeDirectory::in_memory();
        let mut record = PersonalRecord::new(code("EMP001"), "Asha Rao");
        record.age = Some(29);
        record.contact.mobile = Some("9876543210".to_string());

        let created = directory.create_personal(record.clone()).await.unwrap();
        let fetched = directory.get_personal(&code("emp001")).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.full_name, "Asha Rao");
        assert_eq!(fetched.contact.mobile.as_deref(), Some("9876543210"));
    }

    #[tokio::test]
    async fn duplicate_key_is_rejected_and_store_is_unchanged() {
        let directory = EmployeeDirectory::in_memory();
        seed_personal(&directory, "EMP001", "Asha Rao").await;

        let err = directory
            .create_personal(PersonalRecord::new(code("EMP001"), "Someone Else"))
            .await
            .unwrap_err();

        assert_eq!(
            err.domain(),
            Some(&DomainError::duplicate_code(RecordGroup::Personal, "EMP001"))
        );
        let all = directory.list_personal().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].full_name, "Asha Rao");
    }

    #[tokio::test]
    async fn duplicate_login_email_is_rejected_case_insensitively() {
        let directory = EmployeeDirectory::in_memory();
        directory
            .create_professional(ProfessionalRecord::new(
                code("EMP001"),
                "asha@co.com",
                Secret::new("pw"),
            ))
            .await
            .unwrap();

        let err = directory
            .create_professional(ProfessionalRecord::new(
                code("EMP002"),
                "ASHA@co.com",
                Secret::new("pw"),
            ))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn missing_required_field_fails_before_any_write() {
        let directory = EmployeeDirectory::in_memory();
        let err = directory
            .create_personal(PersonalRecord::new(code("EMP001"), "   "))
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Validation(_))));

        // Nothing was registered for the rejected code.
        assert!(
            directory
                .get_full_employee_view(&code("EMP001"))
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn partial_view_has_absent_groups() {
        let directory = EmployeeDirectory::in_memory();
        seed_personal(&directory, "EMP001", "Asha Rao").await;
        directory
            .create_professional(ProfessionalRecord::new(
                code("EMP001"),
                "asha@co.com",
                Secret::new("pw"),
            ))
            .await
            .unwrap();

        let view = directory.get_full_employee_view(&code("EMP001")).await.unwrap();

        assert_eq!(view.full_name(), Some("Asha Rao"));
        assert_eq!(
            view.professional.as_ref().map(|p| p.login_email.as_str()),
            Some("asha@co.com")
        );
        assert!(view.finance.is_none());
        assert_eq!(view.missing_groups(), vec![RecordGroup::Finance]);
    }

    #[tokio::test]
    async fn groups_can_be_populated_in_any_order() {
        let directory = EmployeeDirectory::in_memory();
        directory
            .create_finance(FinanceRecord::new(code("EMP007")))
            .await
            .unwrap();

        let view = directory.get_full_employee_view(&code("EMP007")).await.unwrap();
        assert!(view.personal.is_none());
        assert!(view.finance.is_some());

        seed_personal(&directory, "EMP007", "Late Intake").await;
        let view = directory.get_full_employee_view(&code("EMP007")).await.unwrap();
        assert_eq!(view.full_name(), Some("Late Intake"));
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let directory = EmployeeDirectory::in_memory();
        let err = directory
            .get_full_employee_view(&code("NOPE01"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(directory.get_finance(&code("NOPE01")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_employees_follows_registration_order() {
        let directory = EmployeeDirectory::in_memory();
        directory
            .create_finance(FinanceRecord::new(code("EMP002")))
            .await
            .unwrap();
        seed_personal(&directory, "EMP001", "Asha Rao").await;
        seed_personal(&directory, "EMP002", "Ravi Kumar").await;

        let employees = directory.list_employees().await.unwrap();
        let codes: Vec<&str> = employees.iter().map(|e| e.employment_code.as_str()).collect();
        assert_eq!(codes, vec!["EMP002", "EMP001"]);
        assert!(employees[0].finance.is_some());
        assert_eq!(employees[0].full_name(), Some("Ravi Kumar"));
    }

    #[tokio::test]
    async fn migration_project_links_only_known_members() {
        let directory = EmployeeDirectory::in_memory();
        seed_personal(&directory, "EMP001", "Asha Rao").await;
        seed_personal(&directory, "EMP002", "Ravi Kumar").await;

        let created = directory
            .create_project(
                NewProject::new("Migration").with_members([code("EMP001"), code("EMP002")]),
            )
            .await
            .unwrap();
        assert!(created.dropped_member_keys.is_empty());
        assert_eq!(created.project.project.status, ProjectStatus::Pending);

        let for_first = directory.list_projects_for_member(&code("EMP001")).await.unwrap();
        assert_eq!(for_first.len(), 1);
        assert_eq!(for_first[0].project.title, "Migration");
        assert_eq!(
            for_first[0].assigned_employee_ids,
            vec![code("EMP001"), code("EMP002")]
        );

        assert!(
            directory
                .list_projects_for_member(&code("EMP003"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn migration_project_with_unknown_key_keeps_known_member() {
        let directory = EmployeeDirectory::in_memory();
        seed_personal(&directory, "EMP001", "Asha Rao").await;

        let created = directory
            .create_project(
                NewProject::new("Migration").with_members([code("EMP001"), code("EMP999")]),
            )
            .await
            .unwrap();
        assert_eq!(created.project.assigned_employee_ids, vec![code("EMP001")]);
        assert!(
            directory
                .list_projects_for_member(&code("EMP999"))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn unknown_member_key_is_dropped_and_reported() {
        let directory = EmployeeDirectory::in_memory();
        seed_personal(&directory, "EMP001", "Asha Rao").await;
        // Registered through another group, but without a personal record.
        directory
            .create_finance(FinanceRecord::new(code("EMP002")))
            .await
            .unwrap();

        let created = directory
            .create_project(NewProject::new("Audit").with_members([
                code("EMP001"),
                code("EMP002"),
                code("GHOST1"),
            ]))
            .await
            .unwrap();

        assert_eq!(created.project.assigned_employee_ids, vec![code("EMP001")]);
        assert_eq!(
            created.dropped_member_keys,
            vec![code("EMP002"), code("GHOST1")]
        );
        let stored = directory
            .get_project(created.project.project.id)
            .await
            .unwrap();
        assert_eq!(stored.assigned_employee_ids, vec![code("EMP001")]);
    }

    #[tokio::test]
    async fn listing_and_member_scoped_listing_agree() {
        let directory = EmployeeDirectory::in_memory();
        for (raw, name) in [("EMP001", "A"), ("EMP002", "B"), ("EMP003", "C")] {
            seed_personal(&directory, raw, name).await;
        }
        let plans = [
            ("Alpha", vec!["EMP001", "EMP002"]),
            ("Beta", vec![]),
            ("Gamma", vec!["EMP002", "EMP003"]),
            ("Delta", vec!["EMP003"]),
        ];
        for (title, members) in plans {
            directory
                .create_project(NewProject::new(title).with_members(members.into_iter().map(code)))
                .await
                .unwrap();
        }

        let all = directory.list_projects().await.unwrap();
        assert_eq!(all.len(), 4);
        for raw in ["EMP001", "EMP002", "EMP003"] {
            let member = code(raw);
            let expected: Vec<_> = all.iter().filter(|p| p.has_member(&member)).cloned().collect();
            let scoped = directory.list_projects_for_member(&member).await.unwrap();
            assert_eq!(scoped, expected, "member {raw}");
        }
    }

    #[tokio::test]
    async fn eager_and_per_project_listing_are_identical() {
        let directory = EmployeeDirectory::in_memory();
        seed_personal(&directory, "EMP001", "A").await;
        seed_personal(&directory, "EMP002", "B").await;
        directory
            .create_project(NewProject::new("One").with_members([code("EMP002"), code("EMP001")]))
            .await
            .unwrap();
        directory.create_project(NewProject::new("Two")).await.unwrap();

        let eager = directory.list_projects_with(MemberFetch::Eager).await.unwrap();
        let per_project = directory
            .list_projects_with(MemberFetch::PerProject)
            .await
            .unwrap();
        assert_eq!(eager, per_project);
        assert!(eager[1].assigned_employee_ids.is_empty());
    }

    #[tokio::test]
    async fn overview_includes_member_projects() {
        let directory = EmployeeDirectory::in_memory();
        seed_personal(&directory, "EMP001", "Asha Rao").await;
        directory
            .create_project(NewProject::new("Migration").with_members([code("EMP001")]))
            .await
            .unwrap();
        directory.create_project(NewProject::new("Other")).await.unwrap();

        let overview = directory.employee_overview(&code("EMP001")).await.unwrap();
        assert_eq!(overview.employee.full_name(), Some("Asha Rao"));
        assert_eq!(overview.projects.len(), 1);
        assert_eq!(overview.projects[0].project.title, "Migration");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_creates_for_one_key_have_exactly_one_winner() {
        let directory = EmployeeDirectory::in_memory();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let directory = directory.clone();
                tokio::spawn(async move {
                    directory
                        .create_personal(PersonalRecord::new(code("EMP001"), format!("Writer {i}")))
                        .await
                })
            })
            .collect();

        let mut wins = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(e) if e.is_conflict() => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(directory.list_personal().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generated_code_is_registered_and_usable_by_other_groups() {
        let directory = EmployeeDirectory::in_memory();
        let created = directory
            .create_personal_with_generated_code(PersonalRecord::new(code("TMP000"), "Asha Rao"))
            .await
            .unwrap();
        assert_ne!(created.employment_code, code("TMP000"));

        directory
            .create_finance(FinanceRecord::new(created.employment_code.clone()))
            .await
            .unwrap();
        let view = directory
            .get_full_employee_view(&created.employment_code)
            .await
            .unwrap();
        assert!(view.personal.is_some() && view.finance.is_some());
    }

    #[tokio::test]
    async fn allocate_code_skips_claimed_codes() {
        let store = Arc::new(InMemoryWorkforceStore::new());
        let directory = EmployeeDirectory::from_store(store.clone());

        let first = directory.allocate_code().await.unwrap();
        let second = directory.allocate_code().await.unwrap();
        assert_ne!(first, second);
        assert!(!store.claim(&first).await.unwrap());
    }

    #[tokio::test]
    async fn login_resolves_employment_code() {
        let directory = EmployeeDirectory::in_memory();
        directory
            .create_professional(ProfessionalRecord::new(
                code("EMP001"),
                "asha@co.com",
                Secret::new("s3cret"),
            ))
            .await
            .unwrap();
        let login = EmployeeLogin::new(directory.professional_store());

        let resolved = login
            .login(credentials(" Asha@Co.com ", "s3cret"))
            .await
            .unwrap();
        assert_eq!(resolved, code("EMP001"));

        for (email, secret) in [
            ("asha@co.com", "wrong"),
            ("nobody@co.com", "s3cret"),
            ("not-an-email", "s3cret"),
        ] {
            let err = login.login(credentials(email, secret)).await.unwrap_err();
            assert_eq!(err.domain(), Some(&DomainError::InvalidCredentials));
        }

        let err = login.login(credentials("asha@co.com", "")).await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Validation(_))));
    }

    fn admin_credentials(email: &str, secret: &str) -> AdminCredentials {
        AdminCredentials {
            email: email.to_string(),
            secret: Secret::new(secret),
        }
    }

    #[tokio::test]
    async fn admin_login_is_separate_from_employee_login() {
        let store = Arc::new(InMemoryWorkforceStore::new());
        let directory = EmployeeDirectory::from_store(store.clone());
        directory
            .create_professional(ProfessionalRecord::new(
                code("EMP001"),
                "asha@co.com",
                Secret::new("s3cret"),
            ))
            .await
            .unwrap();

        let admin_login = AdminLogin::new(store);
        admin_login
            .ensure_admin(AdminAccount::new("root@co.com", Secret::new("admin-pw")).unwrap())
            .await
            .unwrap();

        let email = admin_login
            .login(admin_credentials("Root@Co.com", "admin-pw"))
            .await
            .unwrap();
        assert_eq!(email, "root@co.com");

        // An employee's credentials do not open the admin views.
        for (email, secret) in [
            ("root@co.com", "wrong"),
            ("asha@co.com", "s3cret"),
            ("not-an-email", "admin-pw"),
        ] {
            let err = admin_login
                .login(admin_credentials(email, secret))
                .await
                .unwrap_err();
            assert_eq!(err.domain(), Some(&DomainError::InvalidCredentials));
        }

        let err = admin_login
            .login(admin_credentials(" ", "admin-pw"))
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Validation(_))));
    }

    async fn postgres_store() -> Option<Arc<PostgresWorkforceStore>> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = sqlx::PgPool::connect(&url).await.ok()?;
        let store = PostgresWorkforceStore::new(pool);
        store.migrate().await.ok()?;
        Some(Arc::new(store))
    }

    async fn postgres_directory() -> Option<EmployeeDirectory> {
        postgres_store().await.map(EmployeeDirectory::from_store)
    }

    #[tokio::test]
    async fn postgres_admin_accounts_upsert_and_log_in() {
        let Some(store) = postgres_store().await else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return;
        };
        let email = format!("{}@admin.co", EmploymentCode::generate().as_str().to_lowercase());
        let admin_login = AdminLogin::new(store);

        for secret in ["first", "second"] {
            admin_login
                .ensure_admin(AdminAccount::new(&email, Secret::new(secret)).unwrap())
                .await
                .unwrap();
        }

        assert_eq!(
            admin_login.login(admin_credentials(&email, "second")).await.unwrap(),
            email
        );
        let err = admin_login
            .login(admin_credentials(&email, "first"))
            .await
            .unwrap_err();
        assert_eq!(err.domain(), Some(&DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn postgres_records_and_projects() {
        let Some(directory) = postgres_directory().await else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return;
        };

        let created = directory
            .create_personal_with_generated_code(PersonalRecord::new(code("TMP000"), "Asha Rao"))
            .await
            .unwrap();
        let key = created.employment_code.clone();
        let email = format!("{}@co.com", key.as_str().to_lowercase());

        directory
            .create_professional(ProfessionalRecord::new(key.clone(), &email, Secret::new("pw")))
            .await
            .unwrap();
        let duplicate = directory
            .create_personal(PersonalRecord::new(key.clone(), "Again"))
            .await
            .unwrap_err();
        assert!(duplicate.is_conflict());

        let view = directory.get_full_employee_view(&key).await.unwrap();
        assert_eq!(view.full_name(), Some("Asha Rao"));
        assert!(view.finance.is_none());

        let ghost = EmploymentCode::generate();
        let project = directory
            .create_project(NewProject::new("Migration").with_members([key.clone(), ghost.clone()]))
            .await
            .unwrap();
        assert_eq!(project.project.assigned_employee_ids, vec![key.clone()]);
        assert_eq!(project.dropped_member_keys, vec![ghost]);

        let scoped = directory.list_projects_for_member(&key).await.unwrap();
        assert!(scoped.iter().any(|p| p.project.id == project.project.project.id));

        let eager = directory.list_projects_with(MemberFetch::Eager).await.unwrap();
        let per_project = directory
            .list_projects_with(MemberFetch::PerProject)
            .await
            .unwrap();
        assert_eq!(eager, per_project);
    }

    /// Waits for every racer and returns the winner count plus each loser's
    /// conflict field. Any non-conflict failure fails the test.
    async fn tally<T>(
        handles: Vec<tokio::task::JoinHandle<Result<T, crate::StoreError>>>,
    ) -> (usize, Vec<ConflictField>) {
        let mut wins = 0;
        let mut conflicts = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(e) => match e.domain() {
                    Some(DomainError::Conflict { field, .. }) => conflicts.push(*field),
                    _ => panic!("unexpected error: {e}"),
                },
            }
        }
        (wins, conflicts)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn postgres_racing_creates_for_one_key_conflict_on_the_code() {
        let Some(directory) = postgres_directory().await else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return;
        };
        let key = directory.allocate_code().await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let directory = directory.clone();
                let key = key.clone();
                tokio::spawn(async move {
                    directory
                        .create_personal(PersonalRecord::new(key, format!("Writer {i}")))
                        .await
                })
            })
            .collect();

        let (wins, conflicts) = tally(handles).await;
        assert_eq!(wins, 1);
        assert_eq!(conflicts, vec![ConflictField::EmploymentCode; 7]);
        assert!(directory.get_personal(&key).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn postgres_racing_creates_for_one_email_conflict_on_the_email() {
        let Some(directory) = postgres_directory().await else {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return;
        };
        let email = format!("{}@race.co", EmploymentCode::generate().as_str().to_lowercase());

        let mut keys = Vec::new();
        for _ in 0..8 {
            keys.push(directory.allocate_code().await.unwrap());
        }
        let handles: Vec<_> = keys
            .iter()
            .cloned()
            .map(|key| {
                let directory = directory.clone();
                let email = email.clone();
                tokio::spawn(async move {
                    directory
                        .create_professional(ProfessionalRecord::new(key, email, Secret::new("pw")))
                        .await
                })
            })
            .collect();

        let (wins, conflicts) = tally(handles).await;
        assert_eq!(wins, 1);
        assert_eq!(conflicts, vec![ConflictField::LoginEmail; 7]);

        let owner = directory
            .find_professional_by_login_email(&email)
            .await
            .unwrap()
            .unwrap();
        assert!(keys.contains(&owner.employment_code));
    }
}
