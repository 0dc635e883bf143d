//! Tests for instruction encoding and operand decoding.

use crate::code::{CodeError, Opcode, make, read_operands, read_u16};
use pretty_assertions::assert_eq;

#[test]
fn test_make() {
    let cases: &[(Opcode, &[usize], &[u8])] = &[
        (Opcode::Constant, &[65534], &[Opcode::Constant as u8, 255, 254]),
        (Opcode::Add, &[], &[Opcode::Add as u8]),
        (Opcode::GetLocal, &[255], &[Opcode::GetLocal as u8, 255]),
        (
            Opcode::Closure,
            &[65534, 255],
            &[Opcode::Closure as u8, 255, 254, 255],
        ),
    ];

    for (op, operands, expected) in cases {
        let instruction = make(*op, operands).unwrap();
        assert_eq!(&instruction[..], *expected, "encoding {:?}", op);
        assert_eq!(instruction.len(), op.definition().instruction_len());
    }
}

#[test]
fn test_make_is_big_endian() {
    let instruction = make(Opcode::Jump, &[0x0102]).unwrap();
    assert_eq!(instruction, vec![Opcode::Jump as u8, 0x01, 0x02]);
    assert_eq!(read_u16(&instruction[1..]), 0x0102);
}

#[test]
fn test_make_wrong_arity() {
    assert_eq!(
        make(Opcode::Constant, &[]).unwrap_err(),
        CodeError::OperandArityMismatch {
            opcode: Opcode::Constant,
            expected: 1,
            got: 0,
        }
    );
    assert_eq!(
        make(Opcode::Pop, &[1]).unwrap_err(),
        CodeError::OperandArityMismatch {
            opcode: Opcode::Pop,
            expected: 0,
            got: 1,
        }
    );
}

#[test]
fn test_make_rejects_operands_that_do_not_fit() {
    assert_eq!(
        make(Opcode::Constant, &[65536]).unwrap_err(),
        CodeError::OperandOutOfRange {
            opcode: Opcode::Constant,
            operand: 65536,
            width: 2,
        }
    );
    assert_eq!(
        make(Opcode::GetLocal, &[256]).unwrap_err(),
        CodeError::OperandOutOfRange {
            opcode: Opcode::GetLocal,
            operand: 256,
            width: 1,
        }
    );
    // Second operand of OpClosure is a single byte.
    assert!(make(Opcode::Closure, &[65535, 256]).is_err());
    // Boundaries are inclusive.
    assert!(make(Opcode::Constant, &[65535]).is_ok());
    assert!(make(Opcode::GetLocal, &[255]).is_ok());
}

#[test]
fn test_read_operands() {
    let cases: &[(Opcode, &[usize], usize)] = &[
        (Opcode::Constant, &[65535], 2),
        (Opcode::GetLocal, &[255], 1),
        (Opcode::Closure, &[65535, 255], 3),
        (Opcode::Return, &[], 0),
    ];

    for (op, operands, bytes_read) in cases {
        let instruction = make(*op, operands).unwrap();
        let def = op.definition();
        let (decoded, read) = read_operands(def, &instruction[1..]).unwrap();
        assert_eq!(read, *bytes_read);
        assert_eq!(&decoded[..], *operands);
    }
}

#[test]
fn test_every_opcode_round_trips() {
    for op in Opcode::ALL {
        let widths = op.definition().operand_widths;
        let operands: Vec<usize> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| if *width == 2 { 0xBEEF - i } else { 0xA5 + i })
            .collect();

        let instruction = make(op, &operands).unwrap();
        assert_eq!(Opcode::try_from(instruction[0]).unwrap(), op);

        let (decoded, read) = read_operands(op.definition(), &instruction[1..]).unwrap();
        assert_eq!(&decoded[..], &operands[..], "{}", op);
        assert_eq!(read, instruction.len() - 1, "{}", op);
    }
}

#[test]
fn test_read_operands_truncated() {
    let def = Opcode::Closure.definition();
    assert_eq!(
        read_operands(def, &[0x00, 0x01]).unwrap_err(),
        CodeError::TruncatedInstruction {
            opcode: Opcode::Closure,
            expected: 3,
            available: 2,
        }
    );
}

#[test]
fn test_read_operands_ignores_trailing_bytes() {
    let def = Opcode::GetGlobal.definition();
    let (operands, read) = read_operands(def, &[0x00, 0x07, 0xFF, 0xFF]).unwrap();
    assert_eq!(&operands[..], &[7]);
    assert_eq!(read, 2);
}

#[test]
fn test_operand_widths_are_one_or_two_bytes() {
    for op in Opcode::ALL {
        for &width in op.definition().operand_widths {
            assert!(width == 1 || width == 2, "{} has a {}-byte operand", op, width);
        }
    }
}
