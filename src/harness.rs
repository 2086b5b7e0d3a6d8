//! Test-stub synthesis for the execution harness
//!
//! The harness loads generated modules into a host application and calls a
//! stub that stores the entry point's result in a shared dictionary under
//! [`RESULT_KEY`]. Driving the host application is not part of this crate.

use crate::emitter::{emit, Render};
use crate::error::{PyVbaError, Result};
use crate::semantic::VbType;
use crate::vba::{Parameter, ProceduralModule, Procedure, VbExpr, VbStmt};

/// Key under which the stub stores the return value
pub const RESULT_KEY: &str = "ReturnValue";
/// Name of the result dictionary parameter
pub const RESULT_DICT: &str = "ResultDict";
/// Suffix appended to the entry name
pub const STUB_SUFFIX: &str = "_TestStub";

/// Build `<name>_TestStub(ResultDict As Dictionary, <params>)` for a
/// function of `module`
pub fn test_stub(module: &ProceduralModule, name: &str) -> Result<Procedure> {
    let target = module
        .procedure(name)
        .filter(|p| p.is_function())
        .ok_or_else(|| PyVbaError::MissingProcedure {
            name: name.to_string(),
            module: module.name.clone(),
        })?;
    let rettype = target.rettype.clone().unwrap_or_default();

    let mut params = vec![Parameter::new(RESULT_DICT, VbType::dictionary())];
    params.extend(target.params.iter().cloned());

    let args = target
        .params
        .iter()
        .map(|p| VbExpr::typed_name(&p.name, p.ty.clone()))
        .collect();
    let slot = VbExpr::index(
        VbExpr::typed_name(RESULT_DICT, VbType::dictionary()),
        vec![VbExpr::str_lit(RESULT_KEY)],
        VbType::variant(),
    );
    let call = VbExpr::call(&target.name, args, rettype.clone());
    let body = vec![VbStmt::assign(slot, call, &rettype)];

    Ok(Procedure::sub(&format!("{}{}", name, STUB_SUFFIX), params, body))
}

/// Module text followed by the stub for `name`, as loaded by the harness
pub fn render_with_stub(module: &ProceduralModule, name: &str) -> Result<String> {
    let stub = test_stub(module, name)?;
    Ok(format!("{}\n\n{}", emit(module), stub.to_code()))
}
