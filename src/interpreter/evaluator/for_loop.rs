use tracing::warn;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a `for` loop.
    ///
    /// The loop opens its own frame, so variables declared by the
    /// initializers are gone once it finishes. Each iteration checks the
    /// condition, runs the body in a fresh frame and then evaluates the step
    /// assignments.
    ///
    /// An error inside the body is recorded and the loop carries on with the
    /// steps and the next iteration. Errors in the initializers, the
    /// condition or the steps end the loop.
    ///
    /// A loop always yields [`Value::Null`].
    ///
    /// # Errors
    /// [`RuntimeError::IterationLimitExceeded`] once the body has run
    /// [`EvalOptions::max_iterations`](crate::interpreter::evaluator::core::EvalOptions)
    /// times and the condition still holds.
    ///
    /// # Example
    /// ```
    /// use tensorpad::{interpreter::value::core::Value, run};
    ///
    /// let context = run("x := 0; for i := 0; i < 5; i += 1 { x += i }; x");
    /// assert_eq!(context.program_result, Value::Number(10.0));
    /// ```
    pub(crate) fn eval_for(&mut self,
                           node: &Node,
                           initializers: &[Node],
                           condition: &Node,
                           steps: &[Node],
                           body: &Node)
                           -> EvalResult<Value> {
        self.scoped(|ctx| {
                for initializer in initializers {
                    ctx.eval(initializer)?;
                }

                let limit = ctx.options.max_iterations;
                let mut iterations = 0_usize;

                while ctx.eval_condition(condition)? {
                    if iterations == limit {
                        warn!(limit, "for-loop exceeded the iteration limit");
                        return Err(RuntimeError::IterationLimitExceeded { limit,
                                                                          span: node.span });
                    }
                    iterations += 1;

                    let result = ctx.eval(body);
                    ctx.record(result);

                    for step in steps {
                        ctx.eval(step)?;
                    }
                }

                Ok(Value::Null)
            })
    }
}
