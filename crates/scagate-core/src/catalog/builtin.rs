//! Parameter catalogs shipped with the binary.

use crate::catalog::load::load_str;
use crate::catalog::model::Catalog;
use crate::error::CatalogError;

const SCA: &str = include_str!("../../catalogs/sca.json");
const CONTAINER: &str = include_str!("../../catalogs/container.json");

pub const NAMES: &[&str] = &["sca", "container"];

/// Load a built-in catalog by name (`sca` or `container`).
pub fn load(name: &str) -> Result<Catalog, CatalogError> {
    let text = match name {
        "sca" => SCA,
        "container" => CONTAINER,
        other => return Err(CatalogError::UnknownBuiltin(other.to_string())),
    };
    load_str(&format!("builtin:{name}"), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_catalog_loads() {
        for name in NAMES {
            let catalog = load(name).unwrap_or_else(|e| panic!("builtin:{name}: {e}"));
            assert!(!catalog.is_empty());
            assert_eq!(catalog.source_name, format!("builtin:{name}"));
        }
    }

    #[test]
    fn builtin_catalogs_carry_a_skip_test_marker() {
        let sca = load("sca").unwrap();
        assert!(sca.get("SCA_FOSSA_SKIP_TEST").unwrap().is_action_only());

        let container = load("container").unwrap();
        assert!(
            container
                .get("CONTAINER_FOSSA_SKIP_TEST")
                .unwrap()
                .is_action_only()
        );
    }

    #[test]
    fn unknown_builtin_is_an_error() {
        assert!(matches!(
            load("prisma"),
            Err(CatalogError::UnknownBuiltin(name)) if name == "prisma"
        ));
    }
}
