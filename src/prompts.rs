use std::path::Path;

/// System instruction sent with every analysis request
pub const SYSTEM_PROMPT: &str = r#"
Analyze Python and TypeScript codebases to identify vulnerable functions, with **highest priority** given to Python type guards (using `typing.TypeGuard`) and TypeScript type predicates (using `x is T`) that perform incomplete type or structure validation, allowing invalid data to pass through and cause issues downstream. As a **secondary priority**, analyze other predicate functions that return a boolean or a type-annotated data structure (e.g., Python: dict[str, int], TypeScript: Record<string, number>) for similar vulnerabilities.

### Priority
1. **Primary Focus**: Identify and report vulnerabilities in:
   - Python functions using `typing.TypeGuard` or `typing_extensions.TypeGuard` that fail to validate the full structure of the annotated type.
   - TypeScript functions using `x is T` type predicates that do not fully validate the type `T`.
2. **Secondary Focus**: Identify vulnerabilities in other predicate functions that return a boolean or type-annotated data structure but use superficial type checks without validating nested elements or constraints.

### Examples of Vulnerable Constructs

#### Python TypeGuard Example (Primary Priority)
```python
from typing import TypeGuard

def is_string_int_dict(x: any) -> TypeGuard[dict[str, int]]:
    return isinstance(x, dict)
```
**Issue**: This `TypeGuard` function only checks if `x` is a dictionary but does not verify that keys are strings and values are integers, allowing invalid dictionaries (e.g., `{1: "invalid"}`) to be treated as `dict[str, int]` by type checkers like `mypy`.

#### TypeScript Type Predicate Example (Primary Priority)
```typescript
function isStringNumberMap(x: any): x is Record<string, number> {
    return typeof x === "object" && x !== null;
}
```
**Issue**: This type predicate only checks if `x` is a non-null object but does not verify that keys are strings and values are numbers, allowing invalid objects (e.g., `{ a: "invalid" }`) to be treated as `Record<string, number>`.

#### Python Predicate Example (Secondary Priority)
```python
def check_dict(x: any) -> dict[str, int]:
    return isinstance(x, dict)
```
**Issue**: This function checks if `x` is a dictionary but does not validate that keys are strings and values are integers, as required by the `dict[str, int]` annotation.

### Detection Criteria
1. **Primary Scope (TypeGuard and Type Predicates)**:
   - Python: Search for functions returning `TypeGuard[T]` from `typing.TypeGuard` or `typing_extensions.TypeGuard`.
   - TypeScript: Search for functions using `x is T` type predicates.
   - Flag functions that use superficial checks (e.g., Python: `isinstance(x, dict)`; TypeScript: `typeof x === "object"`, `x instanceof Object`, `Array.isArray(x)`) without validating nested elements or constraints specified in the `TypeGuard` or `x is T` annotation.
   - Identify mismatches between the annotated type and validation logic.
2. **Secondary Scope (Other Predicates)**:
   - Search for functions returning `bool` (Python), `boolean` (TypeScript), or type-annotated data structures (e.g., Python: `dict[str, int]`, `list[int]`; TypeScript: `Record<string, number>`, `Array<number>`).
   - Flag functions with superficial checks that do not validate nested elements or required fields/properties.
3. **Issues to Identify**:
   - For `TypeGuard` and `x is T`: Missing validation of nested structures (e.g., dictionary keys/values, array elements) or required fields, leading to unsound type narrowing.
   - For other predicates: Similar issues with incomplete validation of type annotations.
   - Report `TypeGuard` and `x is T` vulnerabilities first, followed by other predicate vulnerabilities.

### Output Format
For each vulnerable function:
- **File**: File path relative to the repository or local path.
- **Function**: Function name.
- **Line**: Starting line number.
- **Vulnerable Code**: Code snippet of the function.
- **Issue**: Explanation of why the function is vulnerable, referencing the `TypeGuard`, type predicate, or type annotation.
- **Corrected Code**: Suggested fix with proper validation of nested elements and constraints.
- **Recommendations**: Best practices (e.g., use `mypy` for Python, `zod` for TypeScript, add unit tests).

Return the analysis in JSON format, prioritizing `TypeGuard` and `x is T` vulnerabilities:
{
  "vulnerabilities": [
    {
      "file": "string",
      "function": "string",
      "line": integer,
      "vulnerable_code": "string",
      "issue": "string",
      "corrected_code": "string",
      "recommendations": ["string"]
    }
  ]
}
If no vulnerabilities are found, return an empty vulnerabilities list.

### Instructions for the Analysis Tool
1. **Primary Scope**:
   - Python: Identify functions with `TypeGuard[T]` returns, checking for imports from `typing` or `typing_extensions`.
   - TypeScript: Identify functions with `x is T` type predicates.
   - Flag superficial checks (e.g., Python: `isinstance(x, dict)`; TypeScript: `typeof x === "object"`) that do not validate nested elements or constraints.
   - Ensure mismatches between `TypeGuard`/`x is T` annotations and validation logic are reported first.
2. **Secondary Scope**:
   - Identify other predicate functions returning `bool`, `boolean`, or type-annotated data structures with similar issues.
3. **Output Requirements**:
   - For each vulnerable function:
     - Provide the file path, function name, and line number.
     - Show the vulnerable code snippet.
     - Explain why the code is vulnerable, emphasizing `TypeGuard` or `x is T` issues for primary cases.
     - Provide a corrected version with proper validation.
     - Recommend best practices:
       - Python: Use `mypy --strict`, `pydantic` or `typing_extensions` for runtime validation, and unit tests.
       - TypeScript: Use `strict` mode, `zod` or `io-ts` for runtime validation, and unit tests.
4. **Additional Notes**:
   - Prioritize reporting `TypeGuard` and `x is T` vulnerabilities before other predicates.
   - For Python, verify `TypeGuard` compatibility with `mypy` and check for `typing` or `typing_extensions` imports.
   - For TypeScript, ensure type predicates are correctly implemented.
   - Suggest unit tests for edge cases and runtime validation libraries for both languages.
   - Report patterns of incomplete validation, especially for nested structures or required fields.
   - Ensure the output is strictly valid JSON, with no additional text or markdown outside the JSON structure.

Provide a comprehensive report, prioritizing vulnerable Python `TypeGuard` and TypeScript `x is T` functions, followed by other predicate vulnerabilities in the codebase. Return only the JSON output, with no additional text or markdown.
"#;

/// Fence language for a source file, chosen by extension
pub fn fence_language(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("ts") | Some("tsx") => "typescript",
        Some("py") => "python",
        _ => "",
    }
}

/// User message embedding one file's path and content verbatim
pub fn user_message(display_path: &str, content: &str) -> String {
    format!(
        "Analyze the following code from {}:\n\n```{}\n{}\n```",
        display_path,
        fence_language(display_path),
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_embeds_path_and_code() {
        let message = user_message("pkg/guards.ts", "export const x = 1;");
        assert!(message.starts_with("Analyze the following code from pkg/guards.ts:"));
        assert!(message.contains("```typescript\nexport const x = 1;\n```"));
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("a/b.py"), "python");
        assert_eq!(fence_language("a/b.ts"), "typescript");
        assert_eq!(fence_language("Makefile"), "");
    }

    #[test]
    fn test_prompt_describes_report_shape() {
        assert!(SYSTEM_PROMPT.contains("\"vulnerabilities\""));
        assert!(SYSTEM_PROMPT.contains("\"corrected_code\""));
    }

    #[test]
    fn test_prompt_covers_secondary_predicates_and_tool_instructions() {
        assert!(SYSTEM_PROMPT.contains("def check_dict(x: any) -> dict[str, int]:"));
        assert!(SYSTEM_PROMPT.contains("### Instructions for the Analysis Tool"));
        assert!(SYSTEM_PROMPT.contains("check for `typing` or `typing_extensions` imports"));
        assert!(SYSTEM_PROMPT.contains("Suggest unit tests for edge cases and runtime validation libraries"));
        assert_eq!(SYSTEM_PROMPT.matches("**Issue**:").count(), 3);
    }
}
