use super::shape::{Signature, ValueShape};

const PRELUDE: &str = r#"import java.util.*;
import java.io.*;
import java.nio.charset.StandardCharsets;
"#;

const DRIVER: &str = r#"
public class Main {
    static final class JsonReader {
        private final String s;
        private int i = 0;

        JsonReader(String s) {
            this.s = s;
        }

        private char peek() {
            while (i < s.length() && Character.isWhitespace(s.charAt(i))) i++;
            if (i >= s.length()) throw new IllegalArgumentException("unexpected end of input");
            return s.charAt(i);
        }

        private void expect(char c) {
            if (peek() != c) throw new IllegalArgumentException("expected '" + c + "'");
            i++;
        }

        Object value() {
            char c = peek();
            if (c == '{') {
                i++;
                Map<String, Object> map = new LinkedHashMap<>();
                if (peek() == '}') { i++; return map; }
                while (true) {
                    String key = string();
                    expect(':');
                    map.put(key, value());
                    if (peek() == ',') { i++; continue; }
                    expect('}');
                    return map;
                }
            }
            if (c == '[') {
                i++;
                List<Object> list = new ArrayList<>();
                if (peek() == ']') { i++; return list; }
                while (true) {
                    list.add(value());
                    if (peek() == ',') { i++; continue; }
                    expect(']');
                    return list;
                }
            }
            if (c == '"') return string();
            if (s.startsWith("true", i)) { i += 4; return Boolean.TRUE; }
            if (s.startsWith("false", i)) { i += 5; return Boolean.FALSE; }
            if (s.startsWith("null", i)) { i += 4; return null; }
            int start = i;
            while (i < s.length() && "+-0123456789.eE".indexOf(s.charAt(i)) >= 0) i++;
            if (start == i) throw new IllegalArgumentException("invalid json value");
            String raw = s.substring(start, i);
            if (raw.contains(".") || raw.contains("e") || raw.contains("E")) return Double.parseDouble(raw);
            return Long.parseLong(raw);
        }

        private String string() {
            expect('"');
            StringBuilder out = new StringBuilder();
            while (i < s.length() && s.charAt(i) != '"') {
                char c = s.charAt(i++);
                if (c != '\\') {
                    out.append(c);
                    continue;
                }
                char e = s.charAt(i++);
                switch (e) {
                    case 'n': out.append('\n'); break;
                    case 't': out.append('\t'); break;
                    case 'r': out.append('\r'); break;
                    case 'b': out.append('\b'); break;
                    case 'f': out.append('\f'); break;
                    case 'u': out.append((char) Integer.parseInt(s.substring(i, i + 4), 16)); i += 4; break;
                    default: out.append(e);
                }
            }
            if (i >= s.length()) throw new IllegalArgumentException("unterminated string");
            i++;
            return out.toString();
        }
    }

    static String quote(String v) {
        StringBuilder out = new StringBuilder("\"");
        for (char c : v.toCharArray()) {
            switch (c) {
                case '"': out.append("\\\""); break;
                case '\\': out.append("\\\\"); break;
                case '\n': out.append("\\n"); break;
                case '\r': out.append("\\r"); break;
                case '\t': out.append("\\t"); break;
                default:
                    if (c < 0x20) out.append(String.format("\\u%04x", (int) c));
                    else out.append(c);
            }
        }
        return out.append('"').toString();
    }

    static String toJson(Object v) {
        if (v == null) return "null";
        if (v instanceof String) return quote((String) v);
        if (v instanceof Character) return quote(String.valueOf(v));
        if (v instanceof Boolean) return v.toString();
        if (v instanceof Double || v instanceof Float) {
            double d = ((Number) v).doubleValue();
            if (!Double.isInfinite(d) && d == Math.rint(d) && Math.abs(d) < 1e15) return Long.toString((long) d);
            return Double.toString(d);
        }
        if (v instanceof Number) return v.toString();
        StringBuilder out = new StringBuilder();
        if (v.getClass().isArray()) {
            out.append('[');
            int n = java.lang.reflect.Array.getLength(v);
            for (int k = 0; k < n; k++) {
                if (k > 0) out.append(',');
                out.append(toJson(java.lang.reflect.Array.get(v, k)));
            }
            return out.append(']').toString();
        }
        if (v instanceof Iterable) {
            out.append('[');
            boolean first = true;
            for (Object item : (Iterable<?>) v) {
                if (!first) out.append(',');
                first = false;
                out.append(toJson(item));
            }
            return out.append(']').toString();
        }
        if (v instanceof Map) {
            out.append('{');
            boolean first = true;
            for (Map.Entry<?, ?> entry : ((Map<?, ?>) v).entrySet()) {
                if (!first) out.append(',');
                first = false;
                out.append(quote(String.valueOf(entry.getKey()))).append(':').append(toJson(entry.getValue()));
            }
            return out.append('}').toString();
        }
        return quote(v.toString());
    }

    static int toInt(Object o) { return ((Number) o).intValue(); }

    static long toLong(Object o) { return ((Number) o).longValue(); }

    static double toDouble(Object o) { return ((Number) o).doubleValue(); }

    static boolean toBool(Object o) { return (Boolean) o; }

    static String toStr(Object o) { return (String) o; }

    @SuppressWarnings("unchecked")
    static List<Object> toList(Object o) { return (List<Object>) o; }
{{CONVERTERS}}
    @SuppressWarnings("unchecked")
    public static void main(String[] argv) throws Exception {
        String source = new String(System.in.readAllBytes(), StandardCharsets.UTF_8);
        Map<String, Object> payload = (Map<String, Object>) new JsonReader(source).value();
        List<Object> cases = (List<Object>) payload.get("cases");
        StringBuilder results = new StringBuilder();
        int passed = 0;
        int failed = 0;
        for (int k = 0; k < cases.size(); k++) {
            Map<String, Object> testCase = (Map<String, Object>) cases.get(k);
            List<Object> input = (List<Object>) testCase.get("input");
            Object expectedRaw = testCase.get("expectedOutput");
            String actualJson = "null";
            String error = null;
            boolean ok = false;
            try {
                if (input.size() != {{ARITY}}) throw new IllegalArgumentException("expected {{ARITY}} arguments");
{{ARGUMENTS}}
                {{RETURN_TYPE}} expected = {{RETURN_CONVERT}}(expectedRaw);
                Object actual = new Solution().{{ENTRY}}({{CALL_ARGS}});
                actualJson = toJson(actual);
                ok = actualJson.equals(toJson(expected));
            } catch (Throwable t) {
                error = t.toString();
            }
            if (ok) passed++; else failed++;
            if (k > 0) results.append(',');
            results.append("{\"id\":").append(quote((String) testCase.get("id")))
                .append(",\"input\":").append(toJson(input))
                .append(",\"actualOutput\":").append(actualJson)
                .append(",\"expectedOutput\":").append(toJson(expectedRaw))
                .append(",\"passed\":").append(ok);
            if (error != null) results.append(",\"error\":").append(quote(error));
            results.append('}');
        }
        PrintStream out = new PrintStream(new FileOutputStream(FileDescriptor.out), true, StandardCharsets.UTF_8);
        out.println();
        out.println("{\"results\":[" + results + "],\"passed\":" + passed + ",\"failed\":" + failed + "}");
        out.flush();
    }
}
"#;

pub(super) fn type_name(shape: &ValueShape) -> String {
    match shape {
        ValueShape::Int | ValueShape::Unknown => "int".to_string(),
        ValueShape::Long => "long".to_string(),
        ValueShape::Float => "double".to_string(),
        ValueShape::Bool => "boolean".to_string(),
        ValueShape::Str => "String".to_string(),
        ValueShape::List(element) => format!("{}[]", type_name(element)),
    }
}

/// Emits one `convN` method per distinct list shape and returns the name of
/// the converter for `shape`.
struct Converters {
    emitted: Vec<(ValueShape, String)>,
    source: String,
}

impl Converters {
    fn new() -> Self {
        Self {
            emitted: Vec::new(),
            source: String::new(),
        }
    }

    fn converter(&mut self, shape: &ValueShape) -> String {
        let element = match shape {
            ValueShape::Int | ValueShape::Unknown => return "toInt".to_string(),
            ValueShape::Long => return "toLong".to_string(),
            ValueShape::Float => return "toDouble".to_string(),
            ValueShape::Bool => return "toBool".to_string(),
            ValueShape::Str => return "toStr".to_string(),
            ValueShape::List(element) => element,
        };

        if let Some((_, name)) = self.emitted.iter().find(|(seen, _)| seen == shape) {
            return name.clone();
        }

        let element_converter = self.converter(element);
        let name = format!("conv{}", self.emitted.len());
        let element_type = type_name(element);
        let base = element_type.trim_end_matches("[]");
        let dims = (element_type.len() - base.len()) / 2;

        self.source.push_str(&format!(
            "\n    static {ty} {name}(Object o) {{\n        List<Object> list = toList(o);\n        {ty} out = new {base}[list.size()]{dims};\n        for (int k = 0; k < list.size(); k++) out[k] = {element_converter}(list.get(k));\n        return out;\n    }}\n",
            ty = type_name(shape),
            dims = "[]".repeat(dims),
        ));
        self.emitted.push((shape.clone(), name.clone()));
        name
    }
}

pub(super) fn render(candidate_source: &str, entry_point: &str, signature: &Signature) -> String {
    let mut converters = Converters::new();

    let arguments = signature
        .params
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            format!(
                "                {ty} arg{index} = {conv}(input.get({index}));",
                ty = type_name(shape),
                conv = converters.converter(shape),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let return_convert = converters.converter(&signature.returns);
    let call_args = (0..signature.params.len())
        .map(|index| format!("arg{index}"))
        .collect::<Vec<_>>()
        .join(", ");

    let driver = DRIVER
        .replace("{{CONVERTERS}}", &converters.source)
        .replace("{{ARITY}}", &signature.params.len().to_string())
        .replace("{{ARGUMENTS}}", &arguments)
        .replace("{{RETURN_TYPE}}", &type_name(&signature.returns))
        .replace("{{RETURN_CONVERT}}", &return_convert)
        .replace("{{ENTRY}}", entry_point)
        .replace("{{CALL_ARGS}}", &call_args);

    format!("{PRELUDE}\n{candidate_source}\n{driver}")
}
