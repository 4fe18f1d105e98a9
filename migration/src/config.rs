/// Naming and layout conventions of the migration registry
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Exact text (ignoring surrounding whitespace) of the line opening the registry block
    pub marker: String,
    /// Module path prefix used in `require(...)`
    pub require_prefix: String,
    /// File stem prefix of migration scripts
    pub file_prefix: String,
    pub file_extension: String,
    /// Version whose migration file serves as the blank template
    pub template_version: String,
    pub indent: String,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            marker: "local migration_masterlist = {".to_string(),
            require_prefix: "data.migrations.".to_string(),
            file_prefix: "migration_".to_string(),
            file_extension: "lua".to_string(),
            template_version: "0.0.0".to_string(),
            indent: "    ".to_string(),
        }
    }
}

impl MigratorConfig {
    /// Module name of the migration for `version`, e.g. `migration_1_0_3`
    #[must_use]
    pub fn module_name(&self, version: &str) -> String {
        format!("{}{}", self.file_prefix, version.replace('.', "_"))
    }

    /// File name of the migration for `version`, e.g. `migration_1_0_3.lua`
    #[must_use]
    pub fn file_name(&self, version: &str) -> String {
        format!("{}.{}", self.module_name(version), self.file_extension)
    }

    #[must_use]
    pub fn template_file_name(&self) -> String {
        self.file_name(&self.template_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_encode_version_with_underscores() {
        let config = MigratorConfig::default();
        assert_eq!(config.module_name("1.0.3"), "migration_1_0_3");
        assert_eq!(config.file_name("1.10.0"), "migration_1_10_0.lua");
        assert_eq!(config.template_file_name(), "migration_0_0_0.lua");
    }
}
