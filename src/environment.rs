use std::env;

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// Empty entries are dropped, so an unset variable yields an empty vector.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `delimiter`: The character to split the environment variable's value by.
///
/// # Returns
/// - `Vec<String>`
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Retrieves an environment variable as a list, or `None` when it is unset or blank.
pub fn get_env_var_as_opt_vec(var: &str, delimiter: char) -> Option<Vec<String>> {
    let values = get_env_var_as_vec(var, delimiter);
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
