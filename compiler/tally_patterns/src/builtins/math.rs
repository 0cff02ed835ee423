//! Integer-literal arithmetic commands: `ADD`, `SUB`, `MUL`, `DIV`.
//!
//! Operands go through the `to_number` converter, so `ADD 1 x` is a binding
//! error rather than a lookup. Results are printed and returned.

use tally_ir::BinaryOp;

use crate::value::apply_binary;
use crate::{EvalResult, InputSpec, OperationContext, OperationDefinition, OperationExecutor};

const OPERANDS: &[InputSpec] = &[
    InputSpec::Converted(1, "to_number"),
    InputSpec::Converted(2, "to_number"),
];

fn arithmetic(
    op: BinaryOp,
    ctx: &OperationContext<'_>,
    exec: &mut dyn OperationExecutor,
) -> EvalResult {
    let left = ctx.converted(1)?;
    let right = ctx.converted(2)?;
    let result = apply_binary(op, &left, &right).map_err(|err| ctx.relocate(2, err))?;
    exec.print(&result.display_value());
    Ok(result)
}

macro_rules! arithmetic_operation {
    ($ty:ident, $name:literal, $pattern:literal, $op:expr, $description:literal, $example:literal $(,)?) => {
        #[doc = concat!("`", $example, "`")]
        pub struct $ty;

        impl OperationDefinition for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn pattern(&self) -> &'static str {
                $pattern
            }

            fn inputs(&self) -> &'static [InputSpec] {
                OPERANDS
            }

            fn description(&self) -> &'static str {
                $description
            }

            fn example(&self) -> &'static str {
                $example
            }

            fn invoke(
                &self,
                ctx: &mut OperationContext<'_>,
                exec: &mut dyn OperationExecutor,
            ) -> EvalResult {
                arithmetic($op, ctx, exec)
            }
        }
    };
}

arithmetic_operation!(
    AddOperation,
    "add",
    r"^ADD\s+(\d+)\s+(\d+)$",
    BinaryOp::Add,
    "print the sum of two numbers",
    "ADD 2 3",
);

arithmetic_operation!(
    SubOperation,
    "sub",
    r"^SUB\s+(\d+)\s+(\d+)$",
    BinaryOp::Sub,
    "print the difference of two numbers",
    "SUB 5 3",
);

arithmetic_operation!(
    MulOperation,
    "mul",
    r"^MUL\s+(\d+)\s+(\d+)$",
    BinaryOp::Mul,
    "print the product of two numbers",
    "MUL 4 6",
);

arithmetic_operation!(
    DivOperation,
    "div",
    r"^DIV\s+(\d+)\s+(\d+)$",
    BinaryOp::Div,
    "print the quotient of two numbers",
    "DIV 10 4",
);
