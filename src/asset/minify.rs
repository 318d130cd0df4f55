//! Bundle minification backends.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Both are pure
//! functions of their input, so repeated builds of unchanged sources
//! produce identical bytes.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify concatenated JavaScript.
///
/// Mangles local identifiers only (top-level names stay untouched, so
/// nothing reachable from the global surface is renamed), drops
/// `console.*` calls and `debugger` statements, and strips comments.
pub fn minify_js(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    // Classic script semantics: inputs share one global scope and run in
    // concatenation order
    let source_type = SourceType::cjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(anyhow!("js parse error: {error}"));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions {
            drop_console: true,
            drop_debugger: true,
            ..CompressOptions::smallest()
        }),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify concatenated CSS without altering the cascade.
pub fn minify_css(source: &str) -> Result<String> {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|e| anyhow!("{e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{e}"))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js_drops_debug_statements() {
        let source = r#"
var answer = 6 * 7; // the answer
console.log("answer", answer);
debugger;
window.answer = answer;
"#;
        let code = minify_js(source).unwrap();
        assert!(!code.contains("console"));
        assert!(!code.contains("debugger"));
        assert!(!code.contains("the answer")); // comments stripped
        assert!(code.contains("window.answer"));
    }

    #[test]
    fn test_minify_js_rejects_invalid_source() {
        assert!(minify_js("function {{{").is_err());
    }

    #[test]
    fn test_minify_js_idempotent() {
        let once = minify_js("window.x = (function () { var long_name = 1; return long_name; })();")
            .unwrap();
        let twice = minify_js(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_minify_css_strips_comments_and_whitespace() {
        let source = "/* banner */\n.x {\n  color: red;\n}\n";
        let code = minify_css(source).unwrap();
        assert!(!code.contains("banner"));
        assert!(!code.contains('\n'));
    }

    #[test]
    fn test_minify_css_idempotent() {
        let once = minify_css(".a{margin:0 auto}.b{color:#fff}").unwrap();
        let twice = minify_css(&once).unwrap();
        assert_eq!(once, twice);
    }
}
