const TEMPLATE: &str = r#"{{CANDIDATE}}

;(function () {
  function __arenaResolve() {
    try {
      if (typeof {{ENTRY}} === 'function') return {{ENTRY}};
    } catch (e) {}
    if (typeof Solution === 'function') {
      const instance = new Solution();
      if (typeof instance['{{ENTRY}}'] === 'function') return instance['{{ENTRY}}'].bind(instance);
    }
    throw new Error("entry point '{{ENTRY}}' is not defined");
  }

  function __arenaCanonical(value) {
    if (Array.isArray(value)) return value.map(__arenaCanonical);
    if (value !== null && typeof value === 'object') {
      const out = {};
      for (const key of Object.keys(value).sort()) out[key] = __arenaCanonical(value[key]);
      return out;
    }
    return value;
  }

  function __arenaRender(value) {
    const text = JSON.stringify(__arenaCanonical(value));
    return text === undefined ? 'null' : text;
  }

  const payload = JSON.parse(require('fs').readFileSync(0, 'utf8'));
  const results = [];
  let passed = 0;
  for (const testCase of payload.cases) {
    const result = {
      id: testCase.id,
      input: testCase.input,
      actualOutput: null,
      expectedOutput: testCase.expectedOutput,
      passed: false,
    };
    try {
      const entry = __arenaResolve();
      const actual = entry(...testCase.input);
      const rendered = __arenaRender(actual);
      result.actualOutput = JSON.parse(rendered);
      result.passed = rendered === __arenaRender(testCase.expectedOutput);
    } catch (err) {
      result.error = String(err && err.stack ? err.message : err);
    }
    if (result.passed) passed += 1;
    results.push(result);
  }
  process.stdout.write('\n' + JSON.stringify({ results, passed, failed: results.length - passed }) + '\n');
})();
"#;

pub(super) fn render(candidate_source: &str, entry_point: &str) -> String {
    TEMPLATE
        .replace("{{ENTRY}}", entry_point)
        .replace("{{CANDIDATE}}", candidate_source)
}
