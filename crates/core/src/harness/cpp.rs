use super::shape::{Signature, ValueShape};

const PRELUDE: &str = r#"#include <bits/stdc++.h>
using namespace std;
"#;

const DRIVER: &str = r#"
namespace arena_harness {

struct Json {
    enum Kind { Null, Bool, Number, String, Array, Object };
    Kind kind = Null;
    bool flag = false;
    std::string text;
    std::vector<Json> items;
    std::vector<std::pair<std::string, Json>> fields;

    const Json& at(const std::string& key) const {
        for (const auto& field : fields) {
            if (field.first == key) return field.second;
        }
        throw std::runtime_error("missing field: " + key);
    }
};

class Parser {
public:
    explicit Parser(const std::string& source) : s(source) {}

    Json parse() { return value(); }

private:
    const std::string& s;
    std::size_t i = 0;

    char peek() {
        while (i < s.size() && std::isspace(static_cast<unsigned char>(s[i]))) ++i;
        if (i >= s.size()) throw std::runtime_error("unexpected end of input");
        return s[i];
    }

    void expect(char c) {
        if (peek() != c) throw std::runtime_error(std::string("expected '") + c + "'");
        ++i;
    }

    static void append_utf8(std::string& out, unsigned cp) {
        if (cp < 0x80) {
            out += static_cast<char>(cp);
        } else if (cp < 0x800) {
            out += static_cast<char>(0xC0 | (cp >> 6));
            out += static_cast<char>(0x80 | (cp & 0x3F));
        } else {
            out += static_cast<char>(0xE0 | (cp >> 12));
            out += static_cast<char>(0x80 | ((cp >> 6) & 0x3F));
            out += static_cast<char>(0x80 | (cp & 0x3F));
        }
    }

    Json string_value() {
        expect('"');
        Json v;
        v.kind = Json::String;
        while (i < s.size() && s[i] != '"') {
            char c = s[i++];
            if (c != '\\') {
                v.text += c;
                continue;
            }
            if (i >= s.size()) break;
            char e = s[i++];
            switch (e) {
                case 'n': v.text += '\n'; break;
                case 't': v.text += '\t'; break;
                case 'r': v.text += '\r'; break;
                case 'b': v.text += '\b'; break;
                case 'f': v.text += '\f'; break;
                case 'u':
                    append_utf8(v.text, static_cast<unsigned>(std::stoul(s.substr(i, 4), nullptr, 16)));
                    i += 4;
                    break;
                default: v.text += e;
            }
        }
        if (i >= s.size()) throw std::runtime_error("unterminated string");
        ++i;
        return v;
    }

    Json value() {
        char c = peek();
        Json v;
        if (c == '{') {
            ++i;
            v.kind = Json::Object;
            if (peek() == '}') { ++i; return v; }
            while (true) {
                Json key = string_value();
                expect(':');
                Json item = value();
                v.fields.emplace_back(key.text, item);
                if (peek() == ',') { ++i; continue; }
                expect('}');
                return v;
            }
        }
        if (c == '[') {
            ++i;
            v.kind = Json::Array;
            if (peek() == ']') { ++i; return v; }
            while (true) {
                v.items.push_back(value());
                if (peek() == ',') { ++i; continue; }
                expect(']');
                return v;
            }
        }
        if (c == '"') return string_value();
        if (s.compare(i, 4, "true") == 0) { i += 4; v.kind = Json::Bool; v.flag = true; return v; }
        if (s.compare(i, 5, "false") == 0) { i += 5; v.kind = Json::Bool; return v; }
        if (s.compare(i, 4, "null") == 0) { i += 4; return v; }
        std::size_t start = i;
        while (i < s.size() && std::strchr("+-0123456789.eE", s[i]) != nullptr) ++i;
        if (start == i) throw std::runtime_error("invalid json value");
        v.kind = Json::Number;
        v.text = s.substr(start, i - start);
        return v;
    }
};

inline std::string quote(const std::string& v) {
    std::string out = "\"";
    for (unsigned char c : v) {
        switch (c) {
            case '"': out += "\\\""; break;
            case '\\': out += "\\\\"; break;
            case '\n': out += "\\n"; break;
            case '\r': out += "\\r"; break;
            case '\t': out += "\\t"; break;
            default:
                if (c < 0x20) {
                    char buf[8];
                    std::snprintf(buf, sizeof(buf), "\\u%04x", c);
                    out += buf;
                } else {
                    out += static_cast<char>(c);
                }
        }
    }
    return out + "\"";
}

inline std::string dump(const Json& v) {
    switch (v.kind) {
        case Json::Null: return "null";
        case Json::Bool: return v.flag ? "true" : "false";
        case Json::Number: return v.text;
        case Json::String: return quote(v.text);
        case Json::Array: {
            std::string out = "[";
            for (std::size_t k = 0; k < v.items.size(); ++k) {
                if (k) out += ",";
                out += dump(v.items[k]);
            }
            return out + "]";
        }
        case Json::Object: {
            std::string out = "{";
            for (std::size_t k = 0; k < v.fields.size(); ++k) {
                if (k) out += ",";
                out += quote(v.fields[k].first) + ":" + dump(v.fields[k].second);
            }
            return out + "}";
        }
    }
    return "null";
}

inline void from_json(const Json& v, int& out) {
    if (v.kind != Json::Number) throw std::runtime_error("expected a number");
    out = static_cast<int>(std::stoll(v.text));
}

inline void from_json(const Json& v, long long& out) {
    if (v.kind != Json::Number) throw std::runtime_error("expected a number");
    out = std::stoll(v.text);
}

inline void from_json(const Json& v, double& out) {
    if (v.kind != Json::Number) throw std::runtime_error("expected a number");
    out = std::stod(v.text);
}

inline void from_json(const Json& v, bool& out) {
    if (v.kind != Json::Bool) throw std::runtime_error("expected a boolean");
    out = v.flag;
}

inline void from_json(const Json& v, std::string& out) {
    if (v.kind != Json::String) throw std::runtime_error("expected a string");
    out = v.text;
}

template <class T>
void from_json(const Json& v, std::vector<T>& out) {
    if (v.kind != Json::Array) throw std::runtime_error("expected a list");
    out.clear();
    for (const auto& item : v.items) {
        T element;
        from_json(item, element);
        out.push_back(element);
    }
}

inline std::string to_json(bool v) { return v ? "true" : "false"; }

inline std::string to_json(const std::string& v) { return quote(v); }

inline std::string to_json(const char* v) { return quote(v); }

template <class T>
typename std::enable_if<std::is_integral<T>::value && !std::is_same<T, bool>::value, std::string>::type
to_json(T v) {
    return std::to_string(v);
}

template <class T>
typename std::enable_if<std::is_floating_point<T>::value, std::string>::type
to_json(T v) {
    if (std::isfinite(v) && v == std::floor(v) && std::fabs(v) < 1e15) {
        return std::to_string(static_cast<long long>(v));
    }
    std::ostringstream out;
    out << std::setprecision(15) << v;
    return out.str();
}

template <class T>
std::string to_json(const std::vector<T>& v) {
    std::string out = "[";
    for (std::size_t k = 0; k < v.size(); ++k) {
        if (k) out += ",";
        T item = v[k];
        out += to_json(item);
    }
    return out + "]";
}

}  // namespace arena_harness

int main() {
    using namespace arena_harness;
    std::ios::sync_with_stdio(false);
    std::string source((std::istreambuf_iterator<char>(std::cin)), std::istreambuf_iterator<char>());
    Json payload = Parser(source).parse();
    const Json& cases = payload.at("cases");

    std::string results;
    int passed = 0;
    int failed = 0;
    for (std::size_t k = 0; k < cases.items.size(); ++k) {
        const Json& test_case = cases.items[k];
        const Json& input = test_case.at("input");
        const Json& expected_raw = test_case.at("expectedOutput");
        std::string actual_json = "null";
        std::string error;
        bool has_error = false;
        bool ok = false;
        try {
            if (input.items.size() != {{ARITY}}) {
                throw std::runtime_error("expected {{ARITY}} arguments");
            }
{{ARGUMENTS}}
            {{RETURN_TYPE}} expected;
            from_json(expected_raw, expected);
            auto actual = ::{{ENTRY}}({{CALL_ARGS}});
            actual_json = to_json(actual);
            ok = actual_json == to_json(expected);
        } catch (const std::exception& e) {
            has_error = true;
            error = e.what();
        } catch (...) {
            has_error = true;
            error = "unknown exception";
        }
        if (ok) ++passed; else ++failed;
        if (k) results += ",";
        results += "{\"id\":" + quote(test_case.at("id").text)
            + ",\"input\":" + dump(input)
            + ",\"actualOutput\":" + actual_json
            + ",\"expectedOutput\":" + dump(expected_raw)
            + ",\"passed\":" + (ok ? "true" : "false");
        if (has_error) results += ",\"error\":" + quote(error);
        results += "}";
    }
    std::cout << "\n{\"results\":[" << results << "],\"passed\":" << passed << ",\"failed\":" << failed << "}" << std::endl;
    return 0;
}
"#;

pub(super) fn type_name(shape: &ValueShape) -> String {
    match shape {
        ValueShape::Int | ValueShape::Unknown => "int".to_string(),
        ValueShape::Long => "long long".to_string(),
        ValueShape::Float => "double".to_string(),
        ValueShape::Bool => "bool".to_string(),
        ValueShape::Str => "std::string".to_string(),
        ValueShape::List(element) => format!("std::vector<{}>", type_name(element)),
    }
}

pub(super) fn render(candidate_source: &str, entry_point: &str, signature: &Signature) -> String {
    let arguments = signature
        .params
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            format!(
                "            {ty} arg{index};\n            from_json(input.items[{index}], arg{index});",
                ty = type_name(shape)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let call_args = (0..signature.params.len())
        .map(|index| format!("arg{index}"))
        .collect::<Vec<_>>()
        .join(", ");

    let driver = DRIVER
        .replace("{{ARITY}}", &signature.params.len().to_string())
        .replace("{{ARGUMENTS}}", &arguments)
        .replace("{{RETURN_TYPE}}", &type_name(&signature.returns))
        .replace("{{ENTRY}}", entry_point)
        .replace("{{CALL_ARGS}}", &call_args);

    format!("{PRELUDE}\n{candidate_source}\n{driver}")
}
