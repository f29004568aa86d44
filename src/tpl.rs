use std::collections::HashMap;

/// Template processor for resolving $VARIABLE references in task strings.
/// Unknown variables are left in place so shell variables pass through.
pub struct Tpl {
    variables: HashMap<String, String>,
}

impl Tpl {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
        }
    }

    /// Register a variable with its value
    pub fn register<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.variables.insert(key.into(), value.into());
    }

    /// Parse a string and resolve all registered $VARIABLE references
    pub fn parse(&self, input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            result.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let ident_len = after
                .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
                .unwrap_or(after.len());
            let ident = &after[..ident_len];

            match self.variables.get(ident) {
                Some(value) if !ident.is_empty() => result.push_str(value),
                _ => {
                    result.push('$');
                    result.push_str(ident);
                }
            }

            rest = &after[ident_len..];
        }

        result.push_str(rest);
        result
    }

    /// Parse a Vec of strings
    pub fn parse_vec(&self, input: &[String]) -> Vec<String> {
        input.iter().map(|s| self.parse(s)).collect()
    }
}

impl Default for Tpl {
    fn default() -> Self {
        Self::new()
    }
}
