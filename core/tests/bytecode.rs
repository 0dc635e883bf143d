use monkey_core::{
    Bytecode, Value,
    bytecode::{BytecodeError, FORMAT_VERSION},
    code::{Instructions, Opcode, make},
    values::CompiledFunction,
};
use pretty_assertions::assert_eq;

fn ins(parts: &[(Opcode, &[usize])]) -> Instructions {
    parts
        .iter()
        .map(|(op, operands)| make(*op, operands).unwrap())
        .collect()
}

fn sample() -> Bytecode {
    use Opcode::*;
    // let greet = fn(name) { "hello " + name }; greet("world")
    let body = ins(&[
        (Constant, &[0]),
        (GetLocal, &[0]),
        (Add, &[]),
        (ReturnValue, &[]),
    ]);
    Bytecode::new(
        ins(&[
            (Closure, &[1, 0]),
            (SetGlobal, &[0]),
            (GetGlobal, &[0]),
            (Constant, &[2]),
            (Call, &[1]),
            (Pop, &[]),
        ]),
        vec![
            Value::from("hello "),
            Value::compiled_function(CompiledFunction::new(body, 1, 1)),
            Value::from("world"),
            Value::Integer(-7),
        ],
    )
}

#[test]
fn test_round_trip() {
    let bytecode = sample();
    let bytes = bytecode.to_bytes().unwrap();
    assert_eq!(&bytes[..4], b"MNKY");
    assert_eq!(bytes[4], FORMAT_VERSION);

    let decoded = Bytecode::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.instructions, bytecode.instructions);
    assert_eq!(decoded.constants.len(), 4);
    assert_eq!(decoded.constants[0], Value::from("hello "));
    assert_eq!(decoded.constants[2], Value::from("world"));
    assert_eq!(decoded.constants[3], Value::Integer(-7));

    // Functions compare by identity, so check the fields.
    let (Value::CompiledFunction(original), Value::CompiledFunction(restored)) =
        (&bytecode.constants[1], &decoded.constants[1])
    else {
        panic!("expected compiled functions");
    };
    assert_eq!(**original, **restored);
}

#[test]
fn test_decoded_program_runs() {
    let bytes = sample().to_bytes().unwrap();
    let decoded = Bytecode::from_bytes(&bytes).unwrap();
    assert_eq!(
        monkey_core::run(&decoded).unwrap(),
        Value::from("hello world")
    );
}

#[test]
fn test_bad_header() {
    assert!(matches!(
        Bytecode::from_bytes(b""),
        Err(BytecodeError::BadHeader)
    ));
    assert!(matches!(
        Bytecode::from_bytes(b"MNKY"),
        Err(BytecodeError::BadHeader)
    ));
    assert!(matches!(
        Bytecode::from_bytes(b"ELF\x7f\x01\x00"),
        Err(BytecodeError::BadHeader)
    ));
}

#[test]
fn test_unsupported_version() {
    let mut bytes = sample().to_bytes().unwrap();
    bytes[4] = FORMAT_VERSION + 1;
    let err = Bytecode::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        BytecodeError::UnsupportedVersion { found } if found == FORMAT_VERSION + 1
    ));
    assert_eq!(
        err.to_string(),
        format!(
            "unsupported bytecode version {} (expected {})",
            FORMAT_VERSION + 1,
            FORMAT_VERSION
        )
    );
}

#[test]
fn test_truncated_payload() {
    let bytes = sample().to_bytes().unwrap();
    let err = Bytecode::from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(matches!(err, BytecodeError::Encoding(_)));
}

#[test]
fn test_runtime_values_are_not_serializable() {
    let bytecode = Bytecode::new(
        Instructions::new(),
        vec![Value::Integer(1), Value::array(vec![])],
    );
    let err = bytecode.to_bytes().unwrap_err();
    assert!(matches!(
        err,
        BytecodeError::UnserializableConstant {
            index: 1,
            type_name: "ARRAY"
        }
    ));
}

#[test]
fn test_empty_program() {
    let bytes = Bytecode::default().to_bytes().unwrap();
    let decoded = Bytecode::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, Bytecode::default());
    assert_eq!(monkey_core::run(&decoded).unwrap(), Value::Null);
}
