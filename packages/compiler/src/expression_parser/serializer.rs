/**
 * Angular Expression Serializer
 *
 * Prints an expression AST back to source form.
 */
use super::ast::*;

pub fn serialize(ast: &AST) -> String {
    match ast {
        AST::EmptyExpr(_) | AST::ImplicitReceiver(_) => String::new(),
        AST::Chain(chain) => chain
            .expressions
            .iter()
            .map(serialize)
            .collect::<Vec<_>>()
            .join("; "),
        AST::Conditional(c) => format!(
            "{} ? {} : {}",
            serialize(&c.condition),
            serialize(&c.true_exp),
            serialize(&c.false_exp)
        ),
        AST::PropertyRead(p) => member(&p.receiver, &p.name, "."),
        AST::SafePropertyRead(p) => member(&p.receiver, &p.name, "?."),
        AST::PropertyWrite(p) => format!(
            "{} = {}",
            member(&p.receiver, &p.name, "."),
            serialize(&p.value)
        ),
        AST::KeyedRead(k) => format!("{}[{}]", serialize(&k.receiver), serialize(&k.key)),
        AST::KeyedWrite(k) => format!(
            "{}[{}] = {}",
            serialize(&k.receiver),
            serialize(&k.key),
            serialize(&k.value)
        ),
        AST::BindingPipe(p) => {
            let mut out = format!("({} | {}", serialize(&p.exp), p.name);
            for arg in &p.args {
                out.push(':');
                out.push_str(&serialize(arg));
            }
            out.push(')');
            out
        }
        AST::LiteralPrimitive(l) => match &l.value {
            LiteralValue::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            LiteralValue::Number(n) => n.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Null => "null".to_string(),
            LiteralValue::Undefined => "undefined".to_string(),
        },
        AST::LiteralArray(a) => format!("[{}]", args(&a.expressions)),
        AST::LiteralMap(m) => {
            let entries: Vec<String> = m
                .keys
                .iter()
                .zip(&m.values)
                .map(|(key, value)| {
                    let key = if key.quoted {
                        format!("\"{}\"", key.key)
                    } else {
                        key.key.clone()
                    };
                    format!("{}: {}", key, serialize(value))
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        AST::Interpolation(i) => {
            let mut out = String::new();
            for (index, text) in i.strings.iter().enumerate() {
                out.push_str(text);
                if let Some(expression) = i.expressions.get(index) {
                    out.push_str("{{ ");
                    out.push_str(&serialize(expression));
                    out.push_str(" }}");
                }
            }
            out
        }
        AST::Binary(b) => format!(
            "{} {} {}",
            serialize(&b.left),
            b.operation,
            serialize(&b.right)
        ),
        AST::PrefixNot(p) => format!("!{}", serialize(&p.expression)),
        AST::NonNullAssert(n) => format!("{}!", serialize(&n.expression)),
        AST::MethodCall(m) => format!("{}({})", member(&m.receiver, &m.name, "."), args(&m.args)),
        AST::SafeMethodCall(m) => {
            format!("{}({})", member(&m.receiver, &m.name, "?."), args(&m.args))
        }
        AST::FunctionCall(f) => format!("{}({})", serialize(&f.target), args(&f.args)),
    }
}

fn member(receiver: &AST, name: &str, separator: &str) -> String {
    if receiver.is_implicit_receiver() {
        name.to_string()
    } else {
        format!("{}{}{}", serialize(receiver), separator, name)
    }
}

fn args(list: &[AST]) -> String {
    list.iter().map(serialize).collect::<Vec<_>>().join(", ")
}
