// @generated by repogen. Do not edit by hand.
//
// Default repository of table `users`.

use repogen::runtime;

/// Finders of table `users`.
///
/// Finders only build queries; nothing runs until the returned builder is fetched.
/// Register an implementation as `crate::repository::UsersRepository` to override them.
pub trait UsersRepository: Send + Sync {
    fn entity_repository(&self) -> &runtime::EntityRepository<crate::entity::Users>;

    /// `findById(id, useNamedParameters)`
    fn find_by_id(
        &self,
        id: i64,
        use_named_parameters: bool,
    ) -> runtime::QueryBuilder<crate::entity::Users> {
        let mut query = self.entity_repository().create_query_builder("u");
        if use_named_parameters {
            query
                .where_clause("u.id = :id")
                .set_parameters(runtime::Parameters::named([
                    ("id", runtime::SqlValue::from(id)),
                ]));
        } else {
            query
                .where_clause("u.id = ?")
                .set_parameters(runtime::Parameters::positional([
                    runtime::SqlValue::from(id),
                ]));
        }
        query
    }

    /// `findByEmail(email, useNamedParameters)`
    fn find_by_email(
        &self,
        email: String,
        use_named_parameters: bool,
    ) -> runtime::QueryBuilder<crate::entity::Users> {
        let mut query = self.entity_repository().create_query_builder("u");
        if use_named_parameters {
            query
                .where_clause("u.email = :email")
                .set_parameters(runtime::Parameters::named([
                    ("email", runtime::SqlValue::from(email)),
                ]));
        } else {
            query
                .where_clause("u.email = ?")
                .set_parameters(runtime::Parameters::positional([
                    runtime::SqlValue::from(email),
                ]));
        }
        query
    }
}

/// Generated default repository of table `users`.
pub struct DefaultUsersRepository {
    base: runtime::EntityRepository<crate::entity::Users>,
}

impl DefaultUsersRepository {
    pub fn new(context: &runtime::RepositoryContext) -> Self {
        Self {
            base: context.repository(),
        }
    }
}

impl UsersRepository for DefaultUsersRepository {
    fn entity_repository(&self) -> &runtime::EntityRepository<crate::entity::Users> {
        &self.base
    }
}

impl UsersRepository for runtime::GenericRepository<crate::entity::Users> {
    fn entity_repository(&self) -> &runtime::EntityRepository<crate::entity::Users> {
        self.base()
    }
}
