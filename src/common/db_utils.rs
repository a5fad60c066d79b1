// src/common/db_utils.rs

/// Padrão `ILIKE` de "contém" para um termo de busca digitado pelo usuário.
/// `%`, `_` e `\` são escapados (o escape padrão do Postgres é `\`).
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_terms_are_wrapped() {
        assert_eq!(like_pattern("helm"), "%helm%");
    }

    #[test]
    fn wildcards_are_matched_literally() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }
}
