//! Canonicalisation of raw debugger signature output.
//!
//! Debuggers print values with result wrappers (`$1 = {...}`), live pointer
//! addresses and platform-specific type spellings. None of that is ABI, so it
//! is stripped or rewritten here before signatures are stored or compared.

/// Replacement for every hexadecimal address literal.
pub const ADDRESS_PLACEHOLDER: &str = "0xXXXX";

/// Platform spellings of common types and their portable names.
const TYPE_ALIASES: &[(&str, &str)] = &[("_Bool", "bool"), ("struct __va_list_tag *", "va_list")];

/// Normalises one raw signature.
///
/// The result is stable across builds and platforms, and normalising it
/// again yields the same string: the rewrites are repeated until none of them
/// applies, so nested wrappers and chained incomplete sequences are fully
/// unfolded.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut sig = raw.trim().to_string();
    loop {
        let next = normalize_pass(&sig);
        if next == sig {
            return sig;
        }
        sig = next;
    }
}

/// One round of every rewrite.
fn normalize_pass(raw: &str) -> String {
    let mut sig = raw.to_string();
    if let Some(inner) = strip_struct_result(&sig) {
        sig = inner.to_string();
    }
    if let Some(inner) = strip_annotated_struct_result(&sig) {
        sig = inner.to_string();
    }
    if let Some(address) = strip_pointer_result(&sig) {
        sig = address.to_string();
    }
    sig = scrub_addresses(&sig);
    sig = repair_incomplete_sequences(&sig);
    for (alias, portable) in TYPE_ALIASES {
        sig = replace_alias(&sig, alias, portable);
    }
    sig.trim().to_string()
}

/// Drops every `, ...` variadic marker.
///
/// Older debuggers omit the marker, so it is ignored when comparing.
/// Stored signatures keep it.
#[must_use]
pub fn normalize_varargs(sig: &str) -> String {
    let mut out = String::with_capacity(sig.len());
    let mut rest = sig;
    while let Some(pos) = rest.find(',') {
        let after = &rest[pos + 1..];
        let mut chars = after.chars();
        match chars.next() {
            Some(ws) if ws.is_whitespace() && chars.as_str().starts_with("...") => {
                out.push_str(&rest[..pos]);
                rest = &after[ws.len_utf8() + 3..];
            }
            _ => {
                out.push_str(&rest[..=pos]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Strips `$N = ` and returns what follows.
fn strip_result_prefix(sig: &str) -> Option<&str> {
    let rest = sig.strip_prefix('$')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = strip_one_whitespace(&rest[digits..])?;
    let rest = rest.strip_prefix('=')?;
    strip_one_whitespace(rest)
}

fn strip_one_whitespace(s: &str) -> Option<&str> {
    let c = s.chars().next().filter(|c| c.is_whitespace())?;
    Some(&s[c.len_utf8()..])
}

/// `$N = {inner}` becomes `inner`.
fn strip_struct_result(sig: &str) -> Option<&str> {
    let inner = strip_result_prefix(sig)?.strip_prefix('{')?.strip_suffix('}')?;
    (!inner.is_empty() && !inner.contains('\n')).then_some(inner)
}

/// `$N = {inner} 0xADDR <name> 0xADDR <name>` becomes `inner`.
fn strip_annotated_struct_result(sig: &str) -> Option<&str> {
    let body = strip_result_prefix(sig)?.strip_prefix('{')?;
    let mut end = body;
    loop {
        end = strip_trailing_annotation(end)?;
        if let Some(inner) = end.strip_suffix('}') {
            if !inner.is_empty() && !inner.contains('\n') {
                return Some(inner);
            }
        }
    }
}

/// Removes one trailing ` 0xADDR <name>` annotation.
fn strip_trailing_annotation(s: &str) -> Option<&str> {
    let s = s.strip_suffix('>')?;
    let open = s.rfind('<')?;
    let name = &s[open + 1..];
    if name.is_empty() || !name.chars().all(is_word_char) {
        return None;
    }
    let s = strip_trailing_whitespace(&s[..open])?;
    let hex_len = s.bytes().rev().take_while(is_lower_hex).count();
    if hex_len == 0 {
        return None;
    }
    let s = s[..s.len() - hex_len].strip_suffix("0x")?;
    strip_trailing_whitespace(s)
}

fn strip_trailing_whitespace(s: &str) -> Option<&str> {
    let c = s.chars().next_back().filter(|c| c.is_whitespace())?;
    Some(&s[..s.len() - c.len_utf8()])
}

/// `$N = 0xADDR <name>` becomes `0xADDR`.
fn strip_pointer_result(sig: &str) -> Option<&str> {
    let rest = strip_result_prefix(sig)?;
    let hex_len = rest.strip_prefix("0x")?.bytes().take_while(is_lower_hex).count();
    if hex_len == 0 {
        return None;
    }
    let (address, tail) = rest.split_at(2 + hex_len);
    let tail = strip_one_whitespace(tail).unwrap_or(tail);
    if tail.is_empty() {
        return Some(address);
    }
    let name = tail.strip_prefix('<')?.strip_suffix('>')?;
    (!name.is_empty() && name.chars().all(is_word_char)).then_some(address)
}

/// Replaces every `0x[0-9a-f]+` with [`ADDRESS_PLACEHOLDER`].
fn scrub_addresses(sig: &str) -> String {
    let mut out = String::with_capacity(sig.len());
    let mut rest = sig;
    while let Some(pos) = rest.find("0x") {
        let after = &rest[pos + 2..];
        let hex_len = after.bytes().take_while(is_lower_hex).count();
        if hex_len == 0 {
            out.push_str(&rest[..pos + 2]);
        } else {
            out.push_str(&rest[..pos]);
            out.push_str(ADDRESS_PLACEHOLDER);
        }
        rest = &after[hex_len..];
    }
    out.push_str(rest);
    out
}

/// Collapses `", <incomplete sequence \ESC>` into `\ESC"`.
///
/// Some debuggers print a truncated multibyte string as the quoted prefix
/// followed by the dangling escape.
fn repair_incomplete_sequences(sig: &str) -> String {
    const MARKER: &str = "\", <incomplete sequence \\";
    let mut out = String::with_capacity(sig.len());
    let mut rest = sig;
    while let Some(pos) = rest.find(MARKER) {
        let after = &rest[pos + MARKER.len()..];
        let esc_len = after
            .bytes()
            .take_while(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            .count();
        if esc_len > 0 && after[esc_len..].starts_with('>') {
            out.push_str(&rest[..pos]);
            out.push('\\');
            out.push_str(&after[..esc_len]);
            out.push('"');
            rest = &after[esc_len + 1..];
        } else {
            out.push_str(&rest[..=pos]);
            rest = &rest[pos + 1..];
        }
    }
    out.push_str(rest);
    out
}

/// Replaces `alias` with `portable`, respecting word boundaries on whichever
/// ends of `alias` are word characters.
fn replace_alias(sig: &str, alias: &str, portable: &str) -> String {
    let guard_start = alias.chars().next().is_some_and(is_word_char);
    let guard_end = alias.chars().next_back().is_some_and(is_word_char);
    let mut out = String::with_capacity(sig.len());
    let mut cursor = 0;
    let mut search = 0;
    while let Some(found) = sig[search..].find(alias) {
        let start = search + found;
        let end = start + alias.len();
        let start_ok = !guard_start || !sig[..start].chars().next_back().is_some_and(is_word_char);
        let end_ok = !guard_end || !sig[end..].chars().next().is_some_and(is_word_char);
        if start_ok && end_ok {
            out.push_str(&sig[cursor..start]);
            out.push_str(portable);
            cursor = end;
            search = end;
        } else {
            search = start + alias.chars().next().map_or(1, char::len_utf8);
        }
    }
    out.push_str(&sig[cursor..]);
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_lower_hex(b: &u8) -> bool {
    b.is_ascii_digit() || (b'a'..=b'f').contains(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_plain_signatures() {
        assert_eq!(normalize("  int (int, char *)  "), "int (int, char *)");
    }

    #[test]
    fn strips_struct_result_wrapper() {
        assert_eq!(normalize("$1 = {int (struct ldb_context *)}"), "int (struct ldb_context *)");
    }

    #[test]
    fn strips_annotated_struct_result() {
        assert_eq!(
            normalize("$3 = {void (void *)} 0x7ffff7a1b2c0 <talloc_free>"),
            "void (void *)"
        );
        assert_eq!(
            normalize("$3 = {void (void *)} 0x1f <a> 0x2e <b_c>"),
            "void (void *)"
        );
    }

    #[test]
    fn pointer_result_becomes_placeholder() {
        assert_eq!(normalize("$1 = 0x7fff1234 <foo>"), ADDRESS_PLACEHOLDER);
        assert_eq!(normalize("$1 = 0xdeadbeef <foo>"), ADDRESS_PLACEHOLDER);
        assert_eq!(normalize("$12 = 0x0"), ADDRESS_PLACEHOLDER);
    }

    #[test]
    fn scrubs_embedded_addresses() {
        assert_eq!(
            normalize("{name = 0x55d4 \"x\", next = 0x0}"),
            "{name = 0xXXXX \"x\", next = 0xXXXX}"
        );
    }

    #[test]
    fn repairs_incomplete_sequence() {
        assert_eq!(
            normalize(r#"{s = "abc", <incomplete sequence \303>}"#),
            r#"{s = "abc\303"}"#
        );
    }

    #[test]
    fn unfolds_nested_result_wrappers() {
        assert_eq!(normalize("$1 = {$2 = {int (int)}}"), "int (int)");
        assert_eq!(normalize("$1 = {$2 = 0x7fff <foo>}"), ADDRESS_PLACEHOLDER);
    }

    #[test]
    fn repairs_chained_incomplete_sequences() {
        assert_eq!(
            normalize(r#"{s = "", <incomplete sequence \303>, <incomplete sequence \251>}"#),
            r#"{s = "\303\251"}"#
        );
    }

    #[test]
    fn maps_platform_types() {
        assert_eq!(normalize("_Bool (int)"), "bool (int)");
        assert_eq!(
            normalize("int (const char *, struct __va_list_tag *)"),
            "int (const char *, va_list)"
        );
    }

    #[test]
    fn alias_respects_word_boundaries() {
        assert_eq!(normalize("my_Bool (int)"), "my_Bool (int)");
        assert_eq!(normalize("_Bool_t (_Bool)"), "_Bool_t (bool)");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "$1 = {int (int)}",
            "$2 = {void (void *)} 0x7ffff7a1b2c0 <talloc_free>",
            "$3 = 0x7fff1234 <foo>",
            "$4 = { padded }",
            r#"{s = "abc", <incomplete sequence \303>}"#,
            "_Bool (struct __va_list_tag *, ...)",
            "0x 0xg 0xabc",
            "$1 = {$2 = {int (int)}}",
            r#"{s = "", <incomplete sequence \303>, <incomplete sequence \251>}"#,
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn varargs_marker_is_dropped() {
        assert_eq!(normalize_varargs("int (int, ...)"), "int (int)");
        assert_eq!(normalize_varargs("int (int,...)"), "int (int,...)");
        assert_eq!(normalize_varargs("int (int, char)"), "int (int, char)");
    }
}
