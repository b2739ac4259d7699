const TEMPLATE: &str = r#"import json as __arena_json
import sys as __arena_sys

{{CANDIDATE}}


def __arena_resolve(name):
    candidate = globals().get(name)
    if callable(candidate):
        return candidate
    solution = globals().get("Solution")
    if solution is not None and hasattr(solution, name):
        return getattr(solution(), name)
    raise NameError("entry point '%s' is not defined" % name)


def __arena_plain(value):
    if isinstance(value, bool):
        return value
    if isinstance(value, float) and value.is_integer():
        return int(value)
    if isinstance(value, (list, tuple)):
        return [__arena_plain(item) for item in value]
    if isinstance(value, dict):
        return {key: __arena_plain(item) for key, item in value.items()}
    return value


def __arena_render(value):
    return __arena_json.dumps(__arena_plain(value), sort_keys=True)


def __arena_main():
    payload = __arena_json.loads(__arena_sys.stdin.read())
    results = []
    passed = 0
    for case in payload["cases"]:
        result = {
            "id": case["id"],
            "input": case["input"],
            "actualOutput": None,
            "expectedOutput": case["expectedOutput"],
            "passed": False,
        }
        try:
            entry = __arena_resolve("{{ENTRY}}")
            rendered = __arena_render(entry(*case["input"]))
            result["actualOutput"] = __arena_json.loads(rendered)
            result["passed"] = rendered == __arena_render(case["expectedOutput"])
        except BaseException as exc:
            result["error"] = "%s: %s" % (type(exc).__name__, exc)
        if result["passed"]:
            passed += 1
        results.append(result)
    __arena_sys.stdout.write("\n" + __arena_json.dumps({"results": results, "passed": passed, "failed": len(results) - passed}) + "\n")


__arena_main()
"#;

pub(super) fn render(candidate_source: &str, entry_point: &str) -> String {
    TEMPLATE
        .replace("{{ENTRY}}", entry_point)
        .replace("{{CANDIDATE}}", candidate_source)
}
