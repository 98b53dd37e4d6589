//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;
use vetclinic_core::ValidationRules;
use vetclinic_db::DbConfig;

use crate::fields::{Field, parse_field};

/// Vet clinic records: clients, providers, vets, products, medicines
/// and pets stored in SurrealDB.
#[derive(Debug, Parser)]
#[command(name = "vetclinic", version)]
pub struct Cli {
    #[command(flatten)]
    pub db: DbArgs,

    /// Require vet phone numbers to start with this prefix (e.g. `54`).
    #[arg(long, env = "VETCLINIC_VET_PHONE_PREFIX", value_name = "prefix")]
    pub vet_phone_prefix: Option<String>,

    /// Log output format. Logs go to stderr.
    #[arg(
        long,
        env = "VETCLINIC_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn rules(&self) -> ValidationRules {
        ValidationRules {
            vet_phone_prefix: self.vet_phone_prefix.clone(),
        }
    }
}

/// SurrealDB connection settings.
#[derive(Debug, Args)]
pub struct DbArgs {
    /// SurrealDB WebSocket address.
    #[arg(long = "db-url", env = "VETCLINIC_DB_URL", default_value = "127.0.0.1:8000")]
    pub url: String,

    #[arg(long = "db-namespace", env = "VETCLINIC_DB_NAMESPACE", default_value = "vetclinic")]
    pub namespace: String,

    #[arg(long = "db-database", env = "VETCLINIC_DB_DATABASE", default_value = "main")]
    pub database: String,

    #[arg(long = "db-user", env = "VETCLINIC_DB_USER", default_value = "root")]
    pub username: String,

    #[arg(
        long = "db-password",
        env = "VETCLINIC_DB_PASSWORD",
        default_value = "root",
        hide_env_values = true
    )]
    pub password: String,
}

impl DbArgs {
    pub fn config(&self) -> DbConfig {
        DbConfig {
            url: self.url.clone(),
            namespace: self.namespace.clone(),
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending schema migrations and exit.
    Migrate,

    #[command(flatten)]
    Records(RecordCommand),
}

/// Commands that go through the clinic service.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Validate the given fields and create a record.
    Create {
        entity: Entity,
        /// `field=value` pairs, e.g. `name=Juan email=juan@mail.com`.
        #[arg(value_parser = parse_field, value_name = "field=value")]
        fields: Vec<Field>,
    },

    /// Show one record.
    Get { entity: Entity, id: Uuid },

    /// List records, oldest first.
    List {
        entity: Entity,
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 50)]
        limit: u64,
        /// Only pets owned by this client.
        #[arg(long, conflicts_with = "provider")]
        client: Option<Uuid>,
        /// Only products supplied by this provider.
        #[arg(long)]
        provider: Option<Uuid>,
    },

    /// Change the given fields. Empty or unparsable values are left as
    /// they are.
    Update {
        entity: Entity,
        id: Uuid,
        #[arg(value_parser = parse_field, value_name = "field=value")]
        fields: Vec<Field>,
    },

    /// Delete a record and whatever depends on it.
    Delete { entity: Entity, id: Uuid },

    /// Associate two records. Linking twice is a no-op.
    Link {
        kind: LinkKind,
        owner: Uuid,
        target: Uuid,
    },

    /// Remove associations. Targets that are not linked are ignored.
    Unlink {
        kind: LinkKind,
        owner: Uuid,
        #[arg(required = true)]
        targets: Vec<Uuid>,
    },

    /// Show the records associated with `owner`.
    Links { kind: LinkKind, owner: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Client,
    Provider,
    Vet,
    Product,
    Medicine,
    Pet,
}

/// Association kinds, named `<owner>-<target>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkKind {
    /// Medicines prescribed to a pet.
    PetMedicine,
    /// Vets attending a pet.
    PetVet,
    /// Products bought by a client.
    ClientProduct,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_fields() {
        let cli = Cli::try_parse_from([
            "vetclinic",
            "create",
            "medicine",
            "name=ibuprofeno",
            "dose=4",
        ])
        .unwrap();

        match cli.command {
            Command::Records(RecordCommand::Create { entity, fields }) => {
                assert_eq!(entity, Entity::Medicine);
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1].key, "dose");
                assert_eq!(fields[1].value, "4");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_field_without_equals() {
        let result = Cli::try_parse_from(["vetclinic", "create", "client", "Juan"]);
        assert!(result.is_err());
    }

    #[test]
    fn unlink_needs_targets() {
        let owner = Uuid::new_v4().to_string();
        let result = Cli::try_parse_from(["vetclinic", "unlink", "pet-vet", owner.as_str()]);
        assert!(result.is_err());
    }

    #[test]
    fn db_settings_default_to_local_root() {
        let cli = Cli::try_parse_from(["vetclinic", "migrate"]).unwrap();
        let config = cli.db.config();
        assert_eq!(config.url, "127.0.0.1:8000");
        assert_eq!(config.namespace, "vetclinic");
        assert_eq!(config.database, "main");
        assert_eq!(config.username, "root");
    }

    #[test]
    fn phone_prefix_becomes_rule() {
        let cli = Cli::try_parse_from(["vetclinic", "--vet-phone-prefix", "54", "migrate"])
            .unwrap();
        assert_eq!(cli.rules().vet_phone_prefix.as_deref(), Some("54"));
        assert!(matches!(cli.command, Command::Migrate));
    }
}
